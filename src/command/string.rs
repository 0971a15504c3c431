use crate::command::{arg_to_i64, arg_to_string, syntax_error, wrong_arg_count};
use crate::resp::Reply;
use crate::store::SharedStore;
use tokio::time::Duration;

pub async fn cmd_get(args: &[Vec<u8>], store: &SharedStore) -> Reply {
    if args.len() != 1 {
        return wrong_arg_count("get");
    }
    let key = match arg_to_string(&args[0]) {
        Some(k) => k,
        None => return Reply::Nil,
    };

    // A write guard even for reads: the lookup may reap an expired entry,
    // and that check-then-remove must be atomic.
    match store.write().await.get(&key) {
        Some(value) => Reply::Bulk(value),
        None => Reply::Nil,
    }
}

/// SET key value [EX seconds | PX milliseconds]
pub async fn cmd_set(args: &[Vec<u8>], store: &SharedStore) -> Reply {
    if args.len() < 2 {
        return wrong_arg_count("set");
    }
    let key = match arg_to_string(&args[0]) {
        Some(k) => k,
        None => return Reply::error("ERR invalid key"),
    };
    let value = args[1].clone();

    let ttl = match args.len() {
        2 => None,
        4 => {
            let unit = match arg_to_string(&args[2]) {
                Some(u) => u.to_uppercase(),
                None => return syntax_error(),
            };
            // A count of zero is accepted and means no expiry.
            let count = match arg_to_i64(&args[3]) {
                Some(n) if n >= 0 => n as u64,
                _ => return syntax_error(),
            };
            match unit.as_str() {
                "EX" => Some(Duration::from_secs(count)),
                "PX" => Some(Duration::from_millis(count)),
                _ => return syntax_error(),
            }
        }
        _ => return syntax_error(),
    };

    store.write().await.set(key, value, ttl);
    Reply::ok()
}
