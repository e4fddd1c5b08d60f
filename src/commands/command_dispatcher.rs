use std::{mem, sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    backend::Backend,
    commands::{CommandContext, CommandError, CommandHandler},
    config::ConnectionConfig,
    reply::Reply,
};

/// Represents errors surfaced by the write/read protocol of a connection.
#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
    /// The command itself failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// `read` was called without a preceding successful `write`.
    #[error("no pending result to read")]
    NoPendingResult,
    /// The backend connection is closed.
    #[error("connection is closed")]
    NotConnected,
}

impl DispatchError {
    /// Converts the error into a RESP-encoded error string suitable for client responses.
    pub fn as_string(&self) -> String {
        match self {
            DispatchError::Command(err) => err.as_string(),
            other => Reply::Error(format!("ERR {}", other)).encode_to_string(),
        }
    }
}

/// Pending result slot of a connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    ResultReady(Reply),
}

/// Drives one logical client connection.
///
/// The upstream client library issues a command with [`write`] and collects
/// its reply with [`read`]. Commands run to completion inside `write`; `read`
/// only hands over what was stored. Calls are strictly sequential, enforced by
/// `&mut self`.
///
/// [`write`]: CommandDispatcher::write
/// [`read`]: CommandDispatcher::read
pub struct CommandDispatcher {
    ctx: CommandContext,
    timeout: Option<Duration>,
    state: DispatchState,
}

impl CommandDispatcher {
    /// Wraps a backend client for the given connection options.
    ///
    /// # Returns
    ///
    /// * `Err(DispatchError::NotConnected)` - If the backend reports itself closed
    pub fn connect(
        backend: Arc<dyn Backend>,
        config: &ConnectionConfig,
    ) -> Result<Self, DispatchError> {
        if !backend.is_connected() {
            return Err(DispatchError::NotConnected);
        }

        debug!(
            address = %config.address(),
            namespace = %config.namespace,
            set = %config.set,
            bin = %config.bin,
            "connected"
        );

        Ok(Self {
            ctx: CommandContext::new(backend, config),
            timeout: config.timeout,
            state: DispatchState::Idle,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.ctx.backend.is_connected()
    }

    /// Closes the backend client and drops any unread result.
    pub fn disconnect(&mut self) {
        debug!("disconnecting");
        self.ctx.backend.close();
        self.state = DispatchState::Idle;
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Executes a command and stores its reply for the next [`read`].
    ///
    /// A failed command leaves the state as it was. A reply that was never
    /// read is replaced.
    ///
    /// [`read`]: CommandDispatcher::read
    pub async fn write(&mut self, verb: &str, arguments: Vec<String>) -> Result<(), DispatchError> {
        let reply = self.execute(verb, arguments).await?;

        if let DispatchState::ResultReady(_) = self.state {
            warn!(command = %verb, "overwriting a result that was never read");
        }
        self.state = DispatchState::ResultReady(reply);

        Ok(())
    }

    /// Hands over the stored reply and returns to `Idle`.
    pub fn read(&mut self) -> Result<Reply, DispatchError> {
        match mem::take(&mut self.state) {
            DispatchState::ResultReady(reply) => Ok(reply),
            DispatchState::Idle => Err(DispatchError::NoPendingResult),
        }
    }

    /// Runs a single command without touching the pending result slot.
    pub async fn execute(
        &self,
        verb: &str,
        arguments: Vec<String>,
    ) -> Result<Reply, DispatchError> {
        if !self.is_connected() {
            return Err(DispatchError::NotConnected);
        }

        let handler = CommandHandler::new(verb, arguments);
        debug!(
            command = %handler.name,
            arguments = handler.arguments.len(),
            "dispatching command"
        );

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, handler.handle_command(&self.ctx))
                .await
                .map_err(|_| CommandError::Timeout)?,
            None => handler.handle_command(&self.ctx).await,
        };

        if let Err(ref err) = result {
            debug!(command = %handler.name, error = %err, "command failed");
        }

        result.map_err(DispatchError::from)
    }
}
