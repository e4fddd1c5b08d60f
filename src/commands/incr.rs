use crate::{
    backend::{procedures, Value},
    commands::{
        arguments::{expect_arity, parse_float, parse_integer},
        CommandContext, CommandError,
    },
    reply::Reply,
};

/// Handles the Redis INCR command.
///
/// Stored values are string-encoded, so the increment runs inside the `add`
/// procedure rather than as a native numeric operation. A missing key counts
/// from 0.
pub async fn incr(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("INCR", &arguments, 1)?;
    add(ctx, &arguments[0], 1).await
}

pub async fn incrby(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("INCRBY", &arguments, 2)?;

    let delta = parse_integer(&arguments[1])?;
    add(ctx, &arguments[0], delta).await
}

pub async fn decr(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("DECR", &arguments, 1)?;
    add(ctx, &arguments[0], -1).await
}

pub async fn decrby(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("DECRBY", &arguments, 2)?;

    let delta = parse_integer(&arguments[1])?
        .checked_neg()
        .ok_or(CommandError::InvalidInteger)?;
    add(ctx, &arguments[0], delta).await
}

/// Handles the Redis INCRBYFLOAT command.
///
/// The delta travels to the procedure in its decimal string form and the new
/// value comes back the same way.
pub async fn incrbyfloat(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    expect_arity("INCRBYFLOAT", &arguments, 2)?;

    parse_float(&arguments[1])?;

    let result = ctx
        .call_procedure(
            &arguments[0],
            procedures::INCRBYFLOAT,
            vec![Value::from(arguments[1].as_str())],
        )
        .await?;

    Ok(Reply::from(result))
}

async fn add(ctx: &CommandContext, name: &str, delta: i64) -> Result<Reply, CommandError> {
    let result = ctx
        .call_procedure(name, procedures::ADD, vec![Value::Integer(delta)])
        .await?;

    Ok(Reply::from(result))
}
