//! Redis command semantics over a record store.
//!
//! This crate lets a Redis client library talk to a namespace/set/bin record
//! store instead of a Redis server. It supports:
//!
//! - Key commands (EXISTS, DEL, EXPIRE, PEXPIRE, EXPIREAT, PEXPIREAT, PERSIST, TTL, PTTL)
//! - String commands (GET, SET, SETEX, PSETEX, SETNX, GETSET, APPEND, STRLEN,
//!   GETRANGE, SETRANGE, INCR, INCRBY, DECR, DECRBY, INCRBYFLOAT)
//! - Multi-key commands (MGET, MSET, MSETNX)
//! - List commands (LPUSH, RPUSH, LPUSHX, RPUSHX, LPOP, RPOP, RPOPLPUSH, LLEN,
//!   LSET, LINDEX, LINSERT, LRANGE, LREM, LTRIM)
//!
//! Every Redis key maps to one record and its value lives in a single bin.
//! Anything the store cannot do natively runs through the stored procedures
//! listed in [`backend::procedures`]. A [`CommandDispatcher`] exposes the
//! `write`/`read` pair the client library drives, over any [`Backend`]
//! implementation; [`MemoryBackend`] is an in-process one.

pub mod backend;
pub mod commands;
pub mod config;
pub mod error_translator;
pub mod key_mapper;
pub mod reply;
pub mod ttl;

pub use backend::{Backend, BackendError, MemoryBackend};
pub use commands::{CommandDispatcher, CommandError, DispatchError};
pub use config::ConnectionConfig;
pub use reply::Reply;
