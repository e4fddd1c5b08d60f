use thiserror::Error;

use crate::{backend::BackendError, reply::Reply};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unsupported command '{0}'")]
    UnsupportedCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("value is not an integer or out of range")]
    InvalidInteger,
    #[error("value is not a valid float")]
    InvalidFloat,
    #[error("syntax error")]
    SyntaxError,
    #[error("invalid expire time in '{0}' command")]
    InvalidExpireTime(String),
    #[error("offset is out of range")]
    OffsetOutOfRange,
    #[error("string exceeds maximum allowed size (proto-max-bulk-len)")]
    StringTooLong,
    #[error("increment or decrement would overflow")]
    Overflow,
    #[error("operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("operation timed out")]
    Timeout,
    #[error("stored procedure {0} is not available")]
    MissingProcedure(String),
    #[error("backend error: {0}")]
    Backend(BackendError),
}

impl CommandError {
    pub fn wrong_arity(command: &str) -> Self {
        CommandError::WrongNumberOfArguments(command.to_lowercase())
    }

    pub fn as_string(&self) -> String {
        match self {
            CommandError::WrongType => Reply::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
            )
            .encode_to_string(),
            CommandError::Backend(err) => err.as_string(),
            other => Reply::Error(format!("ERR {}", other)).encode_to_string(),
        }
    }
}
