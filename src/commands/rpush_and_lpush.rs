use crate::{
    backend::{procedures, Value},
    commands::{arguments::expect_min_arity, CommandContext, CommandError},
    reply::Reply,
};

pub struct PushArguments {
    key: String,
    values: Vec<String>,
}

impl PushArguments {
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        expect_min_arity(command, &arguments, 2)?;

        Ok(Self {
            key: arguments[0].clone(),
            values: arguments[1..].to_vec(),
        })
    }
}

pub async fn lpush(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push(ctx, "LPUSH", procedures::LPUSH, arguments).await
}

pub async fn rpush(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push(ctx, "RPUSH", procedures::RPUSH, arguments).await
}

/// Like LPUSH, but only when the list already exists; replies 0 otherwise.
pub async fn lpushx(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push(ctx, "LPUSHX", procedures::LPUSHX, arguments).await
}

pub async fn rpushx(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push(ctx, "RPUSHX", procedures::RPUSHX, arguments).await
}

/// All pushed values travel to the procedure as a single list argument and
/// the reply is the list length after the push.
async fn push(
    ctx: &CommandContext,
    command: &str,
    function: &str,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    let push_arguments = PushArguments::parse(command, arguments)?;

    let values = push_arguments
        .values
        .into_iter()
        .map(Value::from)
        .collect::<Vec<Value>>();

    let length = ctx
        .call_procedure(&push_arguments.key, function, vec![Value::List(values)])
        .await?;

    Ok(Reply::from(length))
}
