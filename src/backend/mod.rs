//! Contract of the record store this crate translates Redis commands onto.
//!
//! A record is addressed by a [`BackendKey`], holds named bins and carries an
//! optional expiration. Anything the store cannot express as a plain bin
//! mutation runs through [`Backend::call_procedure`] against the procedures
//! named in [`procedures`].
//!
//! Bins hold string-encoded scalars, so the contract deliberately offers no
//! native atomic numeric add: counters go through the `add` procedure.

mod error;
pub mod memory;
pub mod procedures;

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;

pub use error::BackendError;
pub use memory::MemoryBackend;

use crate::key_mapper::BackendKey;

/// Raw expiration reported for records that never expire.
pub const NEVER_EXPIRES: u32 = u32::MAX;

/// Payload of a bin, and argument/result type of stored procedures.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Integer(i64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

pub type Bins = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub bins: Bins,
    pub generation: u32,
    /// Remaining time to live in seconds, or [`NEVER_EXPIRES`].
    pub expiration: u32,
}

impl Record {
    pub fn bin(&self, name: &str) -> Option<&Value> {
        self.bins.get(name)
    }
}

/// Expiration requested on a write or touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiration {
    Never,
    After(Duration),
}

/// How a put treats an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordExistsAction {
    #[default]
    Replace,
    CreateOnly,
    UpdateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WriteOptions {
    /// `None` lets the store apply its default, which for this crate means
    /// "no expiration" as a Redis SET would.
    pub expiration: Option<Expiration>,
    pub exists_action: RecordExistsAction,
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn is_connected(&self) -> bool;

    fn close(&self);

    async fn exists(&self, key: &BackendKey) -> Result<bool, BackendError>;

    /// Fails with [`BackendError::KeyNotFound`] when the record is absent.
    async fn get(&self, key: &BackendKey, bins: &[&str]) -> Result<Record, BackendError>;

    /// Reads generation and expiration only; the returned record has no bins.
    async fn get_header(&self, key: &BackendKey) -> Result<Record, BackendError>;

    async fn put(
        &self,
        key: &BackendKey,
        bins: Bins,
        options: WriteOptions,
    ) -> Result<(), BackendError>;

    /// Appends to a string bin, creating the record when missing.
    async fn append(&self, key: &BackendKey, bin: &str, value: &str) -> Result<(), BackendError>;

    /// Returns whether a record was removed.
    async fn delete(&self, key: &BackendKey) -> Result<bool, BackendError>;

    async fn touch(&self, key: &BackendKey, expiration: Expiration) -> Result<(), BackendError>;

    async fn batch_exists(&self, keys: &[BackendKey]) -> Result<Vec<bool>, BackendError>;

    async fn batch_get(
        &self,
        keys: &[BackendKey],
        bins: &[&str],
    ) -> Result<Vec<Option<Record>>, BackendError>;

    async fn call_procedure(
        &self,
        key: &BackendKey,
        module: &str,
        function: &str,
        arguments: Vec<Value>,
    ) -> Result<Value, BackendError>;
}
