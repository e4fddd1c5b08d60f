mod arguments;
mod batch;
mod command_dispatcher;
mod command_error;
mod command_handler;
mod get;
mod incr;
mod keys;
mod list_elements;
mod llen;
mod lrange;
mod pop;
mod rpush_and_lpush;
mod set;
mod string_range;

use std::sync::Arc;

pub use command_dispatcher::{CommandDispatcher, DispatchError, DispatchState};
pub use command_error::CommandError;
pub use command_handler::CommandHandler;

use crate::{
    backend::{procedures, Backend, BackendError, Bins, Value},
    config::ConnectionConfig,
    key_mapper::{BackendKey, KeyMapper},
};

/// Everything a command needs to reach the backend: the client, the key
/// mapping and the bin holding each key's value.
#[derive(Clone)]
pub struct CommandContext {
    pub backend: Arc<dyn Backend>,
    pub keys: KeyMapper,
    pub bin: String,
}

impl CommandContext {
    pub fn new(backend: Arc<dyn Backend>, config: &ConnectionConfig) -> Self {
        CommandContext {
            backend,
            keys: KeyMapper::new(&config.namespace, &config.set),
            bin: config.bin.clone(),
        }
    }

    pub fn key(&self, name: &str) -> BackendKey {
        self.keys.to_backend_key(name)
    }

    pub fn bins(&self, value: &str) -> Bins {
        Bins::from([(self.bin.clone(), Value::from(value))])
    }

    /// Runs a function of the procedure module against the value bin of `name`.
    pub async fn call_procedure(
        &self,
        name: &str,
        function: &str,
        mut arguments: Vec<Value>,
    ) -> Result<Value, BackendError> {
        arguments.insert(0, Value::from(self.bin.as_str()));

        self.backend
            .call_procedure(&self.key(name), procedures::MODULE, function, arguments)
            .await
    }
}
