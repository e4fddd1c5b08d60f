use crate::{
    backend::Expiration,
    commands::CommandError,
    ttl::{relative_seconds_to_expiration, TtlRequest},
};

pub fn expect_arity(command: &str, arguments: &[String], count: usize) -> Result<(), CommandError> {
    if arguments.len() != count {
        return Err(CommandError::wrong_arity(command));
    }

    Ok(())
}

pub fn expect_min_arity(
    command: &str,
    arguments: &[String],
    count: usize,
) -> Result<(), CommandError> {
    if arguments.len() < count {
        return Err(CommandError::wrong_arity(command));
    }

    Ok(())
}

pub fn parse_integer(argument: &str) -> Result<i64, CommandError> {
    argument
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidInteger)
}

pub fn parse_float(argument: &str) -> Result<f64, CommandError> {
    argument
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(CommandError::InvalidFloat)
}

/// Expiration for a write that must carry a positive TTL.
pub fn positive_expiration(command: &str, seconds: f64) -> Result<Expiration, CommandError> {
    match relative_seconds_to_expiration(seconds) {
        Some(TtlRequest::Expire(expiration)) => Ok(expiration),
        Some(TtlRequest::DeleteNow) | None => {
            Err(CommandError::InvalidExpireTime(command.to_lowercase()))
        }
    }
}
