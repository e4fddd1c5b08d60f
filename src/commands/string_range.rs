use crate::{
    backend::{procedures, Value},
    commands::{
        arguments::{expect_arity, parse_integer},
        CommandContext, CommandError,
    },
    error_translator::Recover,
    reply::Reply,
};

/// Handles the Redis APPEND command.
///
/// The bin is appended to natively and the new length is then read back with
/// the `strlen` procedure. A "key exists" failure of the append replies 0.
pub async fn append(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("APPEND", &arguments, 2)?;

    let appended = ctx
        .backend
        .append(&ctx.key(&arguments[0]), &ctx.bin, &arguments[1])
        .await
        .map(|_| true)
        .or_conflict(false)?;

    if !appended {
        return Ok(Reply::Integer(0));
    }

    let length = ctx
        .call_procedure(&arguments[0], procedures::STRLEN, Vec::new())
        .await?;

    Ok(Reply::from(length))
}

pub async fn strlen(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("STRLEN", &arguments, 1)?;

    let length = ctx
        .call_procedure(&arguments[0], procedures::STRLEN, Vec::new())
        .await
        .or_not_found(Value::Integer(0))?;

    Ok(Reply::from(length))
}

/// Handles the Redis GETRANGE command. Negative offsets count from the end of
/// the string; a missing key yields the empty string.
pub async fn getrange(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    expect_arity("GETRANGE", &arguments, 3)?;

    let start = parse_integer(&arguments[1])?;
    let end = parse_integer(&arguments[2])?;

    let substring = ctx
        .call_procedure(
            &arguments[0],
            procedures::GETRANGE,
            vec![Value::Integer(start), Value::Integer(end)],
        )
        .await
        .or_not_found(Value::String(String::new()))?;

    Ok(Reply::from(substring))
}

/// Handles the Redis SETRANGE command. The resulting string may not grow past
/// [`procedures::MAX_STRING_LENGTH`]; an empty value never writes.
pub async fn setrange(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    expect_arity("SETRANGE", &arguments, 3)?;

    let offset = parse_integer(&arguments[1])?;
    if offset < 0 {
        return Err(CommandError::OffsetOutOfRange);
    }

    let value_length = arguments[2].len() as u64;
    let max_length = procedures::MAX_STRING_LENGTH as u64;
    if value_length > 0 && (offset as u64).saturating_add(value_length) > max_length {
        return Err(CommandError::StringTooLong);
    }

    let length = ctx
        .call_procedure(
            &arguments[0],
            procedures::SETRANGE,
            vec![Value::Integer(offset), Value::from(arguments[2].as_str())],
        )
        .await?;

    Ok(Reply::from(length))
}
