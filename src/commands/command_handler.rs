use crate::{
    commands::{
        batch::{mget, mset, msetnx},
        command_error::CommandError,
        get::get,
        incr::{decr, decrby, incr, incrby, incrbyfloat},
        keys::{del, exists, expire, expireat, persist, pexpire, pexpireat, pttl, ttl},
        list_elements::{lindex, linsert, lrem, lset},
        llen::llen,
        lrange::{lrange, ltrim},
        pop::{lpop, rpop, rpoplpush},
        rpush_and_lpush::{lpush, lpushx, rpush, rpushx},
        set::{getset, psetex, set, setex, setnx},
        string_range::{append, getrange, setrange, strlen},
        CommandContext,
    },
    reply::Reply,
};

/// One command invocation: an upper-cased verb and its raw arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    pub fn new(name: &str, arguments: Vec<String>) -> Self {
        Self {
            name: name.to_uppercase(),
            arguments,
        }
    }

    pub async fn handle_command(&self, ctx: &CommandContext) -> Result<Reply, CommandError> {
        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "EXISTS" => exists(ctx, arguments).await,
            "DEL" => del(ctx, arguments).await,
            "EXPIRE" => expire(ctx, arguments).await,
            "PEXPIRE" => pexpire(ctx, arguments).await,
            "EXPIREAT" => expireat(ctx, arguments).await,
            "PEXPIREAT" => pexpireat(ctx, arguments).await,
            "PERSIST" => persist(ctx, arguments).await,
            "TTL" => ttl(ctx, arguments).await,
            "PTTL" => pttl(ctx, arguments).await,
            "GET" => get(ctx, arguments).await,
            "SET" => set(ctx, arguments).await,
            "SETEX" => setex(ctx, arguments).await,
            "PSETEX" => psetex(ctx, arguments).await,
            "SETNX" => setnx(ctx, arguments).await,
            "GETSET" => getset(ctx, arguments).await,
            "APPEND" => append(ctx, arguments).await,
            "STRLEN" => strlen(ctx, arguments).await,
            "GETRANGE" => getrange(ctx, arguments).await,
            "SETRANGE" => setrange(ctx, arguments).await,
            "INCR" => incr(ctx, arguments).await,
            "INCRBY" => incrby(ctx, arguments).await,
            "DECR" => decr(ctx, arguments).await,
            "DECRBY" => decrby(ctx, arguments).await,
            "INCRBYFLOAT" => incrbyfloat(ctx, arguments).await,
            "MGET" => mget(ctx, arguments).await,
            "MSET" => mset(ctx, arguments).await,
            "MSETNX" => msetnx(ctx, arguments).await,
            "LPUSH" => lpush(ctx, arguments).await,
            "RPUSH" => rpush(ctx, arguments).await,
            "LPUSHX" => lpushx(ctx, arguments).await,
            "RPUSHX" => rpushx(ctx, arguments).await,
            "LPOP" => lpop(ctx, arguments).await,
            "RPOP" => rpop(ctx, arguments).await,
            "RPOPLPUSH" => rpoplpush(ctx, arguments).await,
            "LLEN" => llen(ctx, arguments).await,
            "LSET" => lset(ctx, arguments).await,
            "LINDEX" => lindex(ctx, arguments).await,
            "LINSERT" => linsert(ctx, arguments).await,
            "LRANGE" => lrange(ctx, arguments).await,
            "LREM" => lrem(ctx, arguments).await,
            "LTRIM" => ltrim(ctx, arguments).await,
            _ => Err(CommandError::UnsupportedCommand(self.name.clone())),
        }
    }
}
