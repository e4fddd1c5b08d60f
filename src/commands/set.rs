use crate::{
    backend::{Expiration, RecordExistsAction, WriteOptions},
    commands::{
        arguments::{expect_arity, expect_min_arity, parse_integer, positive_expiration},
        get::read_scalar,
        CommandContext, CommandError,
    },
    error_translator::Recover,
    reply::Reply,
};

/// Represents the parsed arguments for the SET command
#[derive(Debug, PartialEq)]
pub struct SetArguments {
    /// The key name to store the value under
    key: String,
    /// The value to be stored
    value: String,
    /// Expiration of the record, `None` for a record that never expires
    expiration: Option<Expiration>,
    /// Whether the write is conditional on the key being absent or present
    exists_action: RecordExistsAction,
}

impl SetArguments {
    /// Parses `[key, value, options...]` into a SetArguments structure.
    ///
    /// Options are read left to right:
    ///
    /// * `EX seconds` - expire after the given number of seconds
    /// * `PX milliseconds` - expire after the given number of milliseconds
    /// * `NX` - only set the key if it does not already exist
    /// * `XX` - only set the key if it already exists
    ///
    /// # Returns
    ///
    /// * `Err(CommandError::WrongNumberOfArguments)` - If key or value is missing
    /// * `Err(CommandError::SyntaxError)` - On an unknown option, a missing
    ///   option value, two expirations, or NX together with XX
    /// * `Err(CommandError::InvalidInteger)` - If a TTL is not an integer
    /// * `Err(CommandError::InvalidExpireTime)` - If a TTL is zero or negative
    fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        expect_min_arity("SET", &arguments, 2)?;

        let mut expiration: Option<Expiration> = None;
        let mut exists_action = RecordExistsAction::Replace;

        let mut options = arguments[2..].iter();
        while let Some(option) = options.next() {
            match option.to_uppercase().as_str() {
                unit @ ("EX" | "PX") => {
                    if expiration.is_some() {
                        return Err(CommandError::SyntaxError);
                    }

                    let time = options.next().ok_or(CommandError::SyntaxError)?;
                    let time = parse_integer(time)?;

                    let seconds = if unit == "EX" {
                        time as f64
                    } else {
                        time as f64 / 1000.0
                    };
                    expiration = Some(positive_expiration("SET", seconds)?);
                }
                "NX" => {
                    if exists_action == RecordExistsAction::UpdateOnly {
                        return Err(CommandError::SyntaxError);
                    }
                    exists_action = RecordExistsAction::CreateOnly;
                }
                "XX" => {
                    if exists_action == RecordExistsAction::CreateOnly {
                        return Err(CommandError::SyntaxError);
                    }
                    exists_action = RecordExistsAction::UpdateOnly;
                }
                _ => return Err(CommandError::SyntaxError),
            }
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            expiration,
            exists_action,
        })
    }
}

/// Handles the Redis SET command.
///
/// # Returns
///
/// * `Ok(Reply::SimpleString("OK"))` - The value was written
/// * `Ok(Reply::Null)` - NX or XX was given and its condition did not hold
pub async fn set(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;
    write(ctx, set_arguments).await
}

/// Handles the Redis SETEX command: `SETEX key seconds value`.
pub async fn setex(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("SETEX", &arguments, 3)?;

    let seconds = parse_integer(&arguments[1])?;
    let expiration = positive_expiration("SETEX", seconds as f64)?;

    write(ctx, timed_arguments(arguments, expiration)).await
}

/// Handles the Redis PSETEX command: `PSETEX key milliseconds value`.
pub async fn psetex(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("PSETEX", &arguments, 3)?;

    let millis = parse_integer(&arguments[1])?;
    let expiration = positive_expiration("PSETEX", millis as f64 / 1000.0)?;

    write(ctx, timed_arguments(arguments, expiration)).await
}

/// Handles the Redis SETNX command, replying 1 when the key was created.
pub async fn setnx(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("SETNX", &arguments, 2)?;

    let options = WriteOptions {
        expiration: None,
        exists_action: RecordExistsAction::CreateOnly,
    };

    let created = ctx
        .backend
        .put(&ctx.key(&arguments[0]), ctx.bins(&arguments[1]), options)
        .await
        .map(|_| 1)
        .or_conflict(0)?;

    Ok(Reply::Integer(created))
}

/// Handles the Redis GETSET command.
///
/// The read and the write are two separate backend calls, so a concurrent
/// writer may slip in between them.
pub async fn getset(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("GETSET", &arguments, 2)?;

    let previous = read_scalar(ctx, &arguments[0]).await?;

    ctx.backend
        .put(
            &ctx.key(&arguments[0]),
            ctx.bins(&arguments[1]),
            WriteOptions::default(),
        )
        .await?;

    Ok(previous)
}

fn timed_arguments(arguments: Vec<String>, expiration: Expiration) -> SetArguments {
    SetArguments {
        key: arguments[0].clone(),
        value: arguments[2].clone(),
        expiration: Some(expiration),
        exists_action: RecordExistsAction::Replace,
    }
}

async fn write(ctx: &CommandContext, set_arguments: SetArguments) -> Result<Reply, CommandError> {
    let options = WriteOptions {
        expiration: set_arguments.expiration,
        exists_action: set_arguments.exists_action,
    };

    ctx.backend
        .put(
            &ctx.key(&set_arguments.key),
            ctx.bins(&set_arguments.value),
            options,
        )
        .await
        .map(|_| Reply::ok())
        .or_rejected(Reply::Null)
}
