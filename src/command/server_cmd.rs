use crate::command::wrong_arg_count;
use crate::resp::Reply;

pub fn cmd_ping(args: &[Vec<u8>]) -> Reply {
    if args.is_empty() {
        Reply::Simple("PONG".to_string())
    } else if args.len() == 1 {
        Reply::Bulk(args[0].clone())
    } else {
        wrong_arg_count("ping")
    }
}

pub fn cmd_echo(args: &[Vec<u8>]) -> Reply {
    if args.len() != 1 {
        return wrong_arg_count("echo");
    }
    Reply::Bulk(args[0].clone())
}
