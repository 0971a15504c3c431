pub mod key;
pub mod server_cmd;
pub mod string;

use crate::error::CommandError;
use crate::resp::{Reply, Request};
use crate::store::SharedStore;

/// Dispatch a decoded request to the appropriate handler.
///
/// Command-level failures (arity, syntax, unknown name) come back as error
/// replies; they never tear down the connection.
pub async fn dispatch(req: &Request, store: &SharedStore) -> Reply {
    let args = &req.args;
    match req.name.as_str() {
        // Connection
        "PING" => server_cmd::cmd_ping(args),
        "ECHO" => server_cmd::cmd_echo(args),

        // Strings
        "GET" => string::cmd_get(args, store).await,
        "SET" => string::cmd_set(args, store).await,

        // Keys
        "DEL" => key::cmd_del(args, store).await,
        "EXISTS" => key::cmd_exists(args, store).await,

        _ => {
            let args_preview: Vec<String> = args
                .iter()
                .take(3)
                .map(|a| format!("'{}'", String::from_utf8_lossy(a)))
                .collect();
            CommandError::UnknownCommand(req.name.clone(), args_preview.join(" ")).into()
        }
    }
}

/// Extract a UTF-8 string from an argument.
pub(crate) fn arg_to_string(arg: &[u8]) -> Option<String> {
    std::str::from_utf8(arg).ok().map(|s| s.to_string())
}

/// Extract an i64 from an argument.
pub(crate) fn arg_to_i64(arg: &[u8]) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

/// Return a wrong number of arguments error.
pub(crate) fn wrong_arg_count(cmd: &str) -> Reply {
    CommandError::WrongArgCount(cmd.to_string()).into()
}

/// Return a syntax error.
pub(crate) fn syntax_error() -> Reply {
    CommandError::Syntax.into()
}
