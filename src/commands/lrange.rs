use crate::{
    backend::{procedures, Value},
    commands::{
        arguments::{expect_arity, parse_integer},
        CommandContext, CommandError,
    },
    reply::Reply,
};

/// Represents the parsed arguments for the LRANGE and LTRIM commands.
///
/// Both take a key and an inclusive range where negative indexes count from
/// the end of the list (`-1` is the last element).
pub struct RangeArguments {
    /// The key of the list
    key: String,
    /// The starting index of the range
    start_index: i64,
    /// The ending index of the range, inclusive
    end_index: i64,
}

impl RangeArguments {
    /// Parses `[key, start, stop]`.
    ///
    /// # Returns
    ///
    /// * `Err(CommandError::WrongNumberOfArguments)` - If the number of
    ///   arguments is not exactly 3
    /// * `Err(CommandError::InvalidInteger)` - If start or stop is not an integer
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        expect_arity(command, &arguments, 3)?;

        Ok(Self {
            key: arguments[0].clone(),
            start_index: parse_integer(&arguments[1])?,
            end_index: parse_integer(&arguments[2])?,
        })
    }

    fn procedure_arguments(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.start_index),
            Value::Integer(self.end_index),
        ]
    }
}

/// Handles the Redis LRANGE command.
///
/// Indexes are normalized by the `lrange` procedure: out of range indexes are
/// clamped and an empty array is returned when the range selects nothing or
/// the key does not exist.
pub async fn lrange(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let range_arguments = RangeArguments::parse("LRANGE", arguments)?;

    let elements = ctx
        .call_procedure(
            &range_arguments.key,
            procedures::LRANGE,
            range_arguments.procedure_arguments(),
        )
        .await?;

    Ok(Reply::from(elements))
}

/// Handles the Redis LTRIM command, keeping only the elements in the range.
/// Trimming to an empty range removes the key.
pub async fn ltrim(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let range_arguments = RangeArguments::parse("LTRIM", arguments)?;

    ctx.call_procedure(
        &range_arguments.key,
        procedures::LTRIM,
        range_arguments.procedure_arguments(),
    )
    .await?;

    Ok(Reply::ok())
}
