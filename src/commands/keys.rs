use crate::{
    backend::Expiration,
    commands::{
        arguments::{expect_arity, expect_min_arity, parse_integer},
        CommandContext, CommandError,
    },
    error_translator::Recover,
    reply::Reply,
    ttl::{
        absolute_millis_to_relative, absolute_seconds_to_relative, expiration_to_ttl_seconds,
        relative_millis_to_expiration, relative_seconds_to_expiration, ttl_seconds_to_millis,
        unix_now, TtlRequest,
    },
};

/// Unit and reference point of the time argument of an expire-style command.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ExpireKind {
    Seconds,
    Milliseconds,
    UnixSeconds,
    UnixMilliseconds,
}

/// Represents the parsed arguments for the EXPIRE family of commands
struct ExpireArguments {
    key: String,
    request: TtlRequest,
}

impl ExpireArguments {
    /// Parses `[key, time]` and converts the time into a relative expiration.
    ///
    /// Absolute variants are compared against the wall clock once, here. Any
    /// time that is already in the past (or a relative time of zero or less)
    /// becomes [`TtlRequest::DeleteNow`]. A time too far ahead for a record
    /// header is an invalid expire time.
    fn parse(
        command: &str,
        kind: ExpireKind,
        arguments: Vec<String>,
    ) -> Result<Self, CommandError> {
        expect_arity(command, &arguments, 2)?;

        let time = parse_integer(&arguments[1])?;

        let request = match kind {
            ExpireKind::Seconds => relative_seconds_to_expiration(time as f64),
            ExpireKind::Milliseconds => relative_millis_to_expiration(time),
            ExpireKind::UnixSeconds => {
                let seconds = absolute_seconds_to_relative(time as f64, unix_now());
                relative_seconds_to_expiration(seconds)
            }
            ExpireKind::UnixMilliseconds => {
                relative_seconds_to_expiration(absolute_millis_to_relative(time, unix_now()))
            }
        }
        .ok_or_else(|| CommandError::InvalidExpireTime(command.to_lowercase()))?;

        Ok(Self {
            key: arguments[0].clone(),
            request,
        })
    }
}

/// Handles the Redis EXISTS command.
///
/// Every key is checked on its own; the reply counts how many of them exist,
/// so a key named twice counts twice.
pub async fn exists(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_min_arity("EXISTS", &arguments, 1)?;

    let mut count = 0;
    for name in &arguments {
        if ctx.backend.exists(&ctx.key(name)).await? {
            count += 1;
        }
    }

    Ok(Reply::Integer(count))
}

/// Handles the Redis DEL command, replying with the number of keys removed.
pub async fn del(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_min_arity("DEL", &arguments, 1)?;

    let mut count = 0;
    for name in &arguments {
        if ctx.backend.delete(&ctx.key(name)).await? {
            count += 1;
        }
    }

    Ok(Reply::Integer(count))
}

pub async fn expire(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let expire_arguments = ExpireArguments::parse("EXPIRE", ExpireKind::Seconds, arguments)?;
    apply_ttl(ctx, expire_arguments).await
}

pub async fn pexpire(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let expire_arguments =
        ExpireArguments::parse("PEXPIRE", ExpireKind::Milliseconds, arguments)?;
    apply_ttl(ctx, expire_arguments).await
}

pub async fn expireat(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let expire_arguments =
        ExpireArguments::parse("EXPIREAT", ExpireKind::UnixSeconds, arguments)?;
    apply_ttl(ctx, expire_arguments).await
}

pub async fn pexpireat(
    ctx: &CommandContext,
    arguments: Vec<String>,
) -> Result<Reply, CommandError> {
    let expire_arguments =
        ExpireArguments::parse("PEXPIREAT", ExpireKind::UnixMilliseconds, arguments)?;
    apply_ttl(ctx, expire_arguments).await
}

/// Handles the Redis PERSIST command by touching the record with no expiration.
pub async fn persist(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("PERSIST", &arguments, 1)?;

    let key = ctx.key(&arguments[0]);
    let result = ctx
        .backend
        .touch(&key, Expiration::Never)
        .await
        .map(|_| 1)
        .or_not_found(0)?;

    Ok(Reply::Integer(result))
}

pub async fn ttl(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("TTL", &arguments, 1)?;

    Ok(Reply::Integer(ttl_seconds(ctx, &arguments[0]).await?))
}

pub async fn pttl(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_arity("PTTL", &arguments, 1)?;

    let seconds = ttl_seconds(ctx, &arguments[0]).await?;
    Ok(Reply::Integer(ttl_seconds_to_millis(seconds)))
}

async fn ttl_seconds(ctx: &CommandContext, name: &str) -> Result<i64, CommandError> {
    ctx.backend
        .get_header(&ctx.key(name))
        .await
        .map(|record| expiration_to_ttl_seconds(record.expiration))
        .or_not_found(-2)
}

async fn apply_ttl(
    ctx: &CommandContext,
    expire_arguments: ExpireArguments,
) -> Result<Reply, CommandError> {
    let key = ctx.key(&expire_arguments.key);

    let result = match expire_arguments.request {
        TtlRequest::DeleteNow => i64::from(ctx.backend.delete(&key).await?),
        TtlRequest::Expire(expiration) => ctx
            .backend
            .touch(&key, expiration)
            .await
            .map(|_| 1)
            .or_not_found(0)?,
    };

    Ok(Reply::Integer(result))
}
