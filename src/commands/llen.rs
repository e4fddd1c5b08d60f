use crate::{
    backend::procedures,
    commands::{arguments::expect_arity, CommandContext, CommandError},
    reply::Reply,
};

/// Handles the Redis LLEN command. A missing key is an empty list.
pub async fn llen(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("LLEN", &arguments, 1)?;

    let length = ctx
        .call_procedure(&arguments[0], procedures::LLEN, Vec::new())
        .await?;

    Ok(Reply::from(length))
}
