use crate::resp::Reply;

/// User-level command errors. These are always recoverable: they render as
/// `-ERR ...` replies and the connection keeps serving. Framing errors are a
/// different beast and live in [`crate::resp::RespError`].
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgCount(String),

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR unknown command '{0}', with args beginning with: {1}")]
    UnknownCommand(String, String),
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Reply {
        Reply::Error(err.to_string())
    }
}
