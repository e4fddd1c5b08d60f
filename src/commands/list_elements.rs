use crate::{
    backend::{procedures, Value},
    commands::{
        arguments::{expect_arity, parse_integer},
        CommandContext, CommandError,
    },
    reply::Reply,
};

pub async fn lindex(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("LINDEX", &arguments, 2)?;

    let index = parse_integer(&arguments[1])?;

    let element = ctx
        .call_procedure(&arguments[0], procedures::LINDEX, vec![Value::Integer(index)])
        .await?;

    Ok(Reply::from(element))
}

/// Handles the Redis LSET command. Fails with "no such key" on a missing list
/// and "index out of range" when the index misses.
pub async fn lset(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("LSET", &arguments, 3)?;

    let index = parse_integer(&arguments[1])?;

    ctx.call_procedure(
        &arguments[0],
        procedures::LSET,
        vec![Value::Integer(index), Value::from(arguments[2].as_str())],
    )
    .await?;

    Ok(Reply::ok())
}

/// Handles the Redis LINSERT command: `LINSERT key BEFORE|AFTER pivot value`.
///
/// # Returns
///
/// * `Ok(Reply::Integer(n))` - The list length after the insert
/// * `Ok(Reply::Integer(-1))` - If the pivot was not found
/// * `Ok(Reply::Integer(0))` - If the key does not exist
/// * `Err(CommandError::SyntaxError)` - If the placement is neither BEFORE nor AFTER
pub async fn linsert(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    expect_arity("LINSERT", &arguments, 4)?;

    let placement = arguments[1].to_uppercase();
    if placement != "BEFORE" && placement != "AFTER" {
        return Err(CommandError::SyntaxError);
    }

    let length = ctx
        .call_procedure(
            &arguments[0],
            procedures::LINSERT,
            vec![
                Value::from(placement),
                Value::from(arguments[2].as_str()),
                Value::from(arguments[3].as_str()),
            ],
        )
        .await?;

    Ok(Reply::from(length))
}

/// Handles the Redis LREM command.
///
/// A positive count removes from head to tail, a negative one from tail to
/// head, and zero removes every occurrence.
pub async fn lrem(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("LREM", &arguments, 3)?;

    let count = parse_integer(&arguments[1])?;

    let removed = ctx
        .call_procedure(
            &arguments[0],
            procedures::LREM,
            vec![Value::Integer(count), Value::from(arguments[2].as_str())],
        )
        .await?;

    Ok(Reply::from(removed))
}
