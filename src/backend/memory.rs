use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};
use tracing::trace;

use crate::{
    backend::{
        procedures, Backend, BackendError, Bins, Expiration, Record, RecordExistsAction, Value,
        WriteOptions, NEVER_EXPIRES,
    },
    key_mapper::BackendKey,
};

#[derive(Debug, Clone)]
struct StoredRecord {
    bins: Bins,
    generation: u32,
    deadline: Option<Instant>,
}

impl StoredRecord {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    fn header(&self, now: Instant) -> Record {
        Record {
            bins: Bins::new(),
            generation: self.generation,
            expiration: remaining_seconds(self.deadline, now),
        }
    }

    fn to_record(&self, bins: &[&str], now: Instant) -> Record {
        let mut record = self.header(now);
        record.bins = self
            .bins
            .iter()
            .filter(|(name, _)| bins.is_empty() || bins.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        record
    }
}

/// In-process record store implementing [`Backend`], including the
/// stored-procedure module. Expired records are dropped lazily on access.
#[derive(Debug)]
pub struct MemoryBackend {
    records: Mutex<HashMap<BackendKey, StoredRecord>>,
    connected: AtomicBool,
    procedures_registered: bool,
    latency: Option<Duration>,
    rejected_identifiers: HashSet<String>,
    conflicting_identifiers: HashSet<String>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            records: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(true),
            procedures_registered: true,
            latency: None,
            rejected_identifiers: HashSet::new(),
            conflicting_identifiers: HashSet::new(),
        }
    }

    /// A store where the procedure module was never deployed.
    pub fn without_procedures(mut self) -> Self {
        self.procedures_registered = false;
        self
    }

    /// Delays every call, e.g. to exercise client-side timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every put to the given key identifier fail with a server error.
    pub fn rejecting_writes_to(mut self, identifier: &str) -> Self {
        self.rejected_identifiers.insert(identifier.to_string());
        self
    }

    /// Makes every append to the given key identifier fail with "key exists".
    pub fn conflicting_appends_to(mut self, identifier: &str) -> Self {
        self.conflicting_identifiers.insert(identifier.to_string());
        self
    }

    async fn prepare(&self) -> Result<(), BackendError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.is_connected() {
            return Err(BackendError::NotConnected);
        }

        Ok(())
    }
}

fn remaining_seconds(deadline: Option<Instant>, now: Instant) -> u32 {
    let Some(deadline) = deadline else {
        return NEVER_EXPIRES;
    };

    let remaining = deadline.saturating_duration_since(now);
    let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    seconds.min(u64::from(NEVER_EXPIRES - 1)) as u32
}

fn deadline_for(
    expiration: Option<Expiration>,
    now: Instant,
) -> Result<Option<Instant>, BackendError> {
    match expiration {
        None | Some(Expiration::Never) => Ok(None),
        Some(Expiration::After(duration)) => {
            now.checked_add(duration)
                .map(Some)
                .ok_or_else(|| BackendError::Server {
                    code: 4,
                    message: format!("expiration of {}s is out of range", duration.as_secs()),
                })
        }
    }
}

/// Drops the record if its deadline has passed and returns what is still live.
fn live_record<'a>(
    records: &'a mut HashMap<BackendKey, StoredRecord>,
    key: &BackendKey,
    now: Instant,
) -> Option<&'a mut StoredRecord> {
    if records.get(key).is_some_and(|record| record.is_expired(now)) {
        records.remove(key);
    }

    records.get_mut(key)
}

#[async_trait]
impl Backend for MemoryBackend {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn exists(&self, key: &BackendKey) -> Result<bool, BackendError> {
        self.prepare().await?;
        let mut records = self.records.lock().await;

        Ok(live_record(&mut records, key, Instant::now()).is_some())
    }

    async fn get(&self, key: &BackendKey, bins: &[&str]) -> Result<Record, BackendError> {
        self.prepare().await?;
        let now = Instant::now();
        let mut records = self.records.lock().await;

        live_record(&mut records, key, now)
            .map(|record| record.to_record(bins, now))
            .ok_or(BackendError::KeyNotFound)
    }

    async fn get_header(&self, key: &BackendKey) -> Result<Record, BackendError> {
        self.prepare().await?;
        let now = Instant::now();
        let mut records = self.records.lock().await;

        live_record(&mut records, key, now)
            .map(|record| record.header(now))
            .ok_or(BackendError::KeyNotFound)
    }

    async fn put(
        &self,
        key: &BackendKey,
        bins: Bins,
        options: WriteOptions,
    ) -> Result<(), BackendError> {
        self.prepare().await?;

        if self.rejected_identifiers.contains(&key.identifier) {
            return Err(BackendError::Server {
                code: 22,
                message: format!("write to {} rejected", key),
            });
        }

        let now = Instant::now();
        let mut records = self.records.lock().await;
        let deadline = deadline_for(options.expiration, now)?;

        let exists = live_record(&mut records, key, now).is_some();

        match (exists, options.exists_action) {
            (true, RecordExistsAction::CreateOnly) => Err(BackendError::KeyExists),
            (false, RecordExistsAction::UpdateOnly) => Err(BackendError::KeyNotFound),
            (true, _) => {
                if let Some(record) = records.get_mut(key) {
                    record.bins.extend(bins);
                    record.generation += 1;
                    record.deadline = deadline;
                }
                Ok(())
            }
            (false, _) => {
                trace!(%key, "creating record");
                records.insert(
                    key.clone(),
                    StoredRecord {
                        bins,
                        generation: 1,
                        deadline,
                    },
                );
                Ok(())
            }
        }
    }

    async fn append(&self, key: &BackendKey, bin: &str, value: &str) -> Result<(), BackendError> {
        self.prepare().await?;

        if self.conflicting_identifiers.contains(&key.identifier) {
            return Err(BackendError::KeyExists);
        }
        let now = Instant::now();
        let mut records = self.records.lock().await;

        if live_record(&mut records, key, now).is_none() {
            records.insert(
                key.clone(),
                StoredRecord {
                    bins: Bins::from([(bin.to_string(), Value::from(value))]),
                    generation: 1,
                    deadline: None,
                },
            );
            return Ok(());
        }

        let Some(record) = records.get_mut(key) else {
            return Err(BackendError::KeyNotFound);
        };

        let appended = match record.bins.get(bin) {
            None | Some(Value::Nil) => value.to_string(),
            Some(Value::String(current)) => format!("{}{}", current, value),
            Some(Value::Integer(current)) => format!("{}{}", current, value),
            Some(Value::List(_)) => {
                return Err(BackendError::Server {
                    code: 12,
                    message: "bin type error".to_string(),
                });
            }
        };

        record.bins.insert(bin.to_string(), Value::String(appended));
        record.generation += 1;
        Ok(())
    }

    async fn delete(&self, key: &BackendKey) -> Result<bool, BackendError> {
        self.prepare().await?;
        let mut records = self.records.lock().await;

        let existed = live_record(&mut records, key, Instant::now()).is_some();
        records.remove(key);
        Ok(existed)
    }

    async fn touch(&self, key: &BackendKey, expiration: Expiration) -> Result<(), BackendError> {
        self.prepare().await?;
        let now = Instant::now();
        let mut records = self.records.lock().await;

        let deadline = deadline_for(Some(expiration), now)?;
        let record = live_record(&mut records, key, now).ok_or(BackendError::KeyNotFound)?;
        record.deadline = deadline;
        record.generation += 1;
        Ok(())
    }

    async fn batch_exists(&self, keys: &[BackendKey]) -> Result<Vec<bool>, BackendError> {
        self.prepare().await?;
        let now = Instant::now();
        let mut records = self.records.lock().await;

        Ok(keys
            .iter()
            .map(|key| live_record(&mut records, key, now).is_some())
            .collect())
    }

    async fn batch_get(
        &self,
        keys: &[BackendKey],
        bins: &[&str],
    ) -> Result<Vec<Option<Record>>, BackendError> {
        self.prepare().await?;
        let now = Instant::now();
        let mut records = self.records.lock().await;

        Ok(keys
            .iter()
            .map(|key| {
                live_record(&mut records, key, now).map(|record| record.to_record(bins, now))
            })
            .collect())
    }

    async fn call_procedure(
        &self,
        key: &BackendKey,
        module: &str,
        function: &str,
        arguments: Vec<Value>,
    ) -> Result<Value, BackendError> {
        self.prepare().await?;

        if !self.procedures_registered
            || module != procedures::MODULE
            || !procedures::is_known(function)
        {
            return Err(BackendError::ProcedureNotFound {
                module: module.to_string(),
                function: function.to_string(),
            });
        }

        let Some((Value::String(bin), arguments)) = arguments.split_first() else {
            return Err(BackendError::Procedure(
                "ERR invalid procedure arguments".to_string(),
            ));
        };

        let now = Instant::now();
        let mut records = self.records.lock().await;

        let before = live_record(&mut records, key, now)
            .and_then(|record| record.bins.get(bin).cloned());
        let mut slot = before.clone();
        let result = procedures::execute(function, arguments, &mut slot)?;

        if slot == before {
            return Ok(result);
        }

        match (slot, records.get_mut(key)) {
            (Some(value), Some(record)) => {
                record.bins.insert(bin.clone(), value);
                record.generation += 1;
            }
            (Some(value), None) => {
                records.insert(
                    key.clone(),
                    StoredRecord {
                        bins: Bins::from([(bin.clone(), value)]),
                        generation: 1,
                        deadline: None,
                    },
                );
            }
            (None, Some(record)) => {
                record.bins.remove(bin);
                record.generation += 1;

                // A record without bins does not exist
                if record.bins.is_empty() {
                    records.remove(key);
                }
            }
            (None, None) => {}
        }

        Ok(result)
    }
}
