//! Maps backend result codes onto Redis return conventions.
//!
//! "Key not found" and "key exists" are ordinary outcomes for many Redis
//! commands and are turned into that command's documented value. Timeouts
//! and missing procedures get their own [`CommandError`] variants; anything
//! else is passed through untouched.

use tracing::debug;

use crate::{backend::BackendError, commands::CommandError};

impl From<BackendError> for CommandError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout => CommandError::Timeout,
            BackendError::ProcedureNotFound { module, function } => {
                CommandError::MissingProcedure(format!("{}.{}", module, function))
            }
            other => CommandError::Backend(other),
        }
    }
}

pub trait Recover<T> {
    /// Replaces a "key not found" failure with `value`.
    fn or_not_found(self, value: T) -> Result<T, CommandError>;

    /// Replaces a "key exists" failure with `value`.
    fn or_conflict(self, value: T) -> Result<T, CommandError>;

    /// Replaces either condition of a conditional write with `value`.
    fn or_rejected(self, value: T) -> Result<T, CommandError>;
}

impl<T> Recover<T> for Result<T, BackendError> {
    fn or_not_found(self, value: T) -> Result<T, CommandError> {
        match self {
            Err(BackendError::KeyNotFound) => {
                debug!("key not found, using documented fallback");
                Ok(value)
            }
            other => other.map_err(CommandError::from),
        }
    }

    fn or_conflict(self, value: T) -> Result<T, CommandError> {
        match self {
            Err(BackendError::KeyExists) => {
                debug!("key exists, using documented fallback");
                Ok(value)
            }
            other => other.map_err(CommandError::from),
        }
    }

    fn or_rejected(self, value: T) -> Result<T, CommandError> {
        match self {
            Err(BackendError::KeyNotFound) | Err(BackendError::KeyExists) => Ok(value),
            other => other.map_err(CommandError::from),
        }
    }
}
