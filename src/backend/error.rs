use thiserror::Error;

use crate::reply::Reply;

/// Result codes surfaced by a record store client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("key not found")]
    KeyNotFound,
    #[error("key already exists")]
    KeyExists,
    #[error("operation timed out")]
    Timeout,
    #[error("procedure {module}.{function} is not registered")]
    ProcedureNotFound { module: String, function: String },
    /// A stored procedure ran and reported a failure of its own.
    #[error("{0}")]
    Procedure(String),
    #[error("server error {code}: {message}")]
    Server { code: i32, message: String },
    #[error("client is not connected")]
    NotConnected,
}

impl BackendError {
    pub fn as_string(&self) -> String {
        match self {
            BackendError::Procedure(message) => {
                // Procedures already speak in Redis error prefixes
                if message.starts_with("ERR") || message.starts_with("WRONGTYPE") {
                    Reply::Error(message.clone()).encode_to_string()
                } else {
                    Reply::Error(format!("ERR {}", message)).encode_to_string()
                }
            }
            other => Reply::Error(format!("ERR {}", other)).encode_to_string(),
        }
    }
}
