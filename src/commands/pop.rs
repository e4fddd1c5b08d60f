use tracing::debug;

use crate::{
    backend::{procedures, Value},
    commands::{
        arguments::{expect_arity, parse_integer},
        CommandContext, CommandError,
    },
    reply::Reply,
};

/// Represents the parsed arguments for LPOP and RPOP
pub struct PopArguments {
    key: String,
    /// With a count the reply is an array, without it a single element
    count: Option<i64>,
}

impl PopArguments {
    /// Parses `[key]` or `[key, count]`.
    ///
    /// # Returns
    ///
    /// * `Err(CommandError::WrongNumberOfArguments)` - If no key or more than
    ///   two arguments are given
    /// * `Err(CommandError::InvalidInteger)` - If the count is not a
    ///   non-negative integer
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() || arguments.len() > 2 {
            return Err(CommandError::wrong_arity(command));
        }

        let count = match arguments.get(1) {
            Some(count) => {
                let count = parse_integer(count)?;
                if count < 0 {
                    return Err(CommandError::InvalidInteger);
                }
                Some(count)
            }
            None => None,
        };

        Ok(Self {
            key: arguments[0].clone(),
            count,
        })
    }
}

pub async fn lpop(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pop_arguments = PopArguments::parse("LPOP", arguments)?;
    pop(ctx, procedures::LPOP, pop_arguments).await
}

pub async fn rpop(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pop_arguments = PopArguments::parse("RPOP", arguments)?;
    pop(ctx, procedures::RPOP, pop_arguments).await
}

/// Handles the Redis RPOPLPUSH command.
///
/// Pops the tail of `source` and, when something was popped, pushes it onto
/// the head of `destination`. These are two independent procedure calls: if
/// the push fails the popped element is lost.
pub async fn rpoplpush(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    expect_arity("RPOPLPUSH", &arguments, 2)?;

    let (source, destination) = (&arguments[0], &arguments[1]);

    let popped = ctx
        .call_procedure(source, procedures::RPOP, Vec::new())
        .await?;

    if popped == Value::Nil {
        return Ok(Reply::Null);
    }

    debug!(%source, %destination, "moving popped element");
    ctx.call_procedure(
        destination,
        procedures::LPUSH,
        vec![Value::List(vec![popped.clone()])],
    )
    .await?;

    Ok(Reply::from(popped))
}

async fn pop(
    ctx: &CommandContext,
    function: &str,
    pop_arguments: PopArguments,
) -> Result<Reply, CommandError> {
    let arguments = match pop_arguments.count {
        Some(count) => vec![Value::Integer(count)],
        None => Vec::new(),
    };

    let popped = ctx
        .call_procedure(&pop_arguments.key, function, arguments)
        .await?;

    Ok(Reply::from(popped))
}
