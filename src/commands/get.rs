use crate::{
    backend::{Record, Value},
    commands::{arguments::expect_arity, CommandContext, CommandError},
    error_translator::Recover,
    reply::Reply,
};

/// Handles the Redis GET command.
///
/// Reads only the value bin of the record mapped from the key.
///
/// # Returns
///
/// * `Ok(Reply::BulkString)` - The stored value
/// * `Ok(Reply::Null)` - If the key does not exist or has expired
/// * `Err(CommandError::WrongType)` - If the key holds a list
/// * `Err(CommandError::WrongNumberOfArguments)` - If not exactly one key is given
pub async fn get(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("GET", &arguments, 1)?;

    read_scalar(ctx, &arguments[0]).await
}

/// Reads the value bin of `name` as a Redis string reply.
pub(crate) async fn read_scalar(ctx: &CommandContext, name: &str) -> Result<Reply, CommandError> {
    let record = ctx
        .backend
        .get(&ctx.key(name), &[ctx.bin.as_str()])
        .await
        .map(Some)
        .or_not_found(None)?;

    match record {
        Some(record) => scalar_reply(&record, &ctx.bin),
        None => Ok(Reply::Null),
    }
}

pub(crate) fn scalar_reply(record: &Record, bin: &str) -> Result<Reply, CommandError> {
    match record.bin(bin) {
        None | Some(Value::Nil) => Ok(Reply::Null),
        Some(Value::String(s)) => Ok(Reply::BulkString(s.clone())),
        Some(Value::Integer(i)) => Ok(Reply::BulkString(i.to_string())),
        Some(Value::List(_)) => Err(CommandError::WrongType),
    }
}

/// Like [`scalar_reply`] but for batch reads, where a missing or non-string
/// entry is reported as nil rather than failing the whole reply.
pub(crate) fn scalar_or_null(record: Option<&Record>, bin: &str) -> Reply {
    record
        .and_then(|record| scalar_reply(record, bin).ok())
        .unwrap_or(Reply::Null)
}
