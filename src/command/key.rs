use crate::command::{arg_to_string, wrong_arg_count};
use crate::resp::Reply;
use crate::store::SharedStore;

pub async fn cmd_del(args: &[Vec<u8>], store: &SharedStore) -> Reply {
    if args.is_empty() {
        return wrong_arg_count("del");
    }

    let mut store = store.write().await;
    let mut count = 0i64;
    for arg in args {
        if let Some(key) = arg_to_string(arg) {
            if store.del(&key) {
                count += 1;
            }
        }
    }

    Reply::Integer(count)
}

pub async fn cmd_exists(args: &[Vec<u8>], store: &SharedStore) -> Reply {
    if args.is_empty() {
        return wrong_arg_count("exists");
    }

    let mut store = store.write().await;
    let mut count = 0i64;
    for arg in args {
        if let Some(key) = arg_to_string(arg) {
            if store.exists(&key) {
                count += 1;
            }
        }
    }

    Reply::Integer(count)
}
