//! Multi-key string commands.
//!
//! None of these are atomic across keys: the store offers no multi-record
//! transaction, so MSET may apply partially and MSETNX checks existence
//! before writing in a separate step.

use tracing::warn;

use crate::{
    backend::WriteOptions,
    commands::{arguments::expect_min_arity, get::scalar_or_null, CommandContext, CommandError},
    reply::Reply,
};

/// Key/value pairs of MSET and MSETNX.
struct PairArguments {
    pairs: Vec<(String, String)>,
}

impl PairArguments {
    fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        expect_min_arity(command, &arguments, 2)?;

        if arguments.len() % 2 != 0 {
            return Err(CommandError::wrong_arity(command));
        }

        let pairs = arguments
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        Ok(Self { pairs })
    }
}

/// Handles the Redis MGET command with a single batch read. Missing keys and
/// keys holding something other than a string come back as nil; a failure of
/// the batch call itself fails the command.
pub async fn mget(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    expect_min_arity("MGET", &arguments, 1)?;

    let keys = ctx.keys.to_backend_keys(&arguments);
    let records = ctx.backend.batch_get(&keys, &[ctx.bin.as_str()]).await?;

    Ok(Reply::Array(
        records
            .iter()
            .map(|record| scalar_or_null(record.as_ref(), &ctx.bin))
            .collect(),
    ))
}

/// Handles the Redis MSET command.
///
/// Each pair is written on its own. A failed write is logged and skipped, and
/// the reply is always OK.
pub async fn mset(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pair_arguments = PairArguments::parse("MSET", arguments)?;

    for (name, value) in pair_arguments.pairs {
        let key = ctx.key(&name);

        if let Err(err) = ctx
            .backend
            .put(&key, ctx.bins(&value), WriteOptions::default())
            .await
        {
            warn!(%key, error = %err, "MSET write failed, continuing with remaining keys");
        }
    }

    Ok(Reply::ok())
}

/// Handles the Redis MSETNX command.
///
/// Replies 0 without writing anything when any key exists. Otherwise every
/// pair is written with a plain put and the reply is 1; a key created by
/// someone else between the check and the writes is overwritten.
pub async fn msetnx(ctx: &CommandContext, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pair_arguments = PairArguments::parse("MSETNX", arguments)?;

    let names = pair_arguments
        .pairs
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<&str>>();
    let keys = ctx.keys.to_backend_keys(&names);

    let existing = ctx.backend.batch_exists(&keys).await?;
    if existing.into_iter().any(|exists| exists) {
        return Ok(Reply::Integer(0));
    }

    for (key, (_, value)) in keys.iter().zip(pair_arguments.pairs.iter()) {
        ctx.backend
            .put(key, ctx.bins(value), WriteOptions::default())
            .await?;
    }

    Ok(Reply::Integer(1))
}
