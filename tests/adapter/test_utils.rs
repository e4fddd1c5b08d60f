use std::{sync::Arc, time::Duration};

use redis_record_adapter::{
    backend::{procedures, Backend, MemoryBackend, Value},
    commands::{CommandDispatcher, CommandError, CommandHandler, DispatchError},
    config::ConnectionConfig,
    key_mapper::KeyMapper,
    reply::Reply,
};

/// Test utilities for simplifying command tests
pub struct TestUtils;

/// Test environment: a dispatcher over an in-memory backend
pub struct TestEnv {
    pub backend: Arc<MemoryBackend>,
    pub dispatcher: CommandDispatcher,
    pub config: ConnectionConfig,
}

impl TestEnv {
    /// Create a new test environment with default connection options
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new(), ConnectionConfig::default())
    }

    /// Create a test environment over a customised backend
    pub fn with_backend(backend: MemoryBackend, config: ConnectionConfig) -> Self {
        let backend = Arc::new(backend);
        let dispatcher = CommandDispatcher::connect(backend.clone(), &config)
            .expect("memory backend starts connected");

        Self {
            backend,
            dispatcher,
            config,
        }
    }

    /// Write a command and read back its reply
    pub async fn exec_command(&mut self, command: CommandHandler) -> Result<Reply, DispatchError> {
        self.dispatcher
            .write(&command.name, command.arguments)
            .await?;
        self.dispatcher.read()
    }

    /// Execute a command and assert it succeeds with expected reply
    pub async fn exec_command_success_response(
        &mut self,
        command: CommandHandler,
        expected_response: Reply,
    ) {
        let description = format!("{} {:?}", command.name, command.arguments);
        let result = self.exec_command(command).await;

        assert_eq!(result, Ok(expected_response), "executing {}", description);
    }

    /// Execute a command and assert it fails with the expected error
    pub async fn exec_command_error_response(
        &mut self,
        command: CommandHandler,
        expected_error: CommandError,
    ) {
        let description = format!("{} {:?}", command.name, command.arguments);
        let result = self.exec_command(command).await;

        assert_eq!(
            result,
            Err(DispatchError::Command(expected_error)),
            "executing {}",
            description
        );
    }

    /// Run a procedure of the module directly, bypassing the command layer
    pub async fn call_procedure(&self, key: &str, function: &str, arguments: Vec<Value>) -> Value {
        let mut arguments = arguments;
        arguments.insert(0, Value::from(self.config.bin.as_str()));

        let keys = KeyMapper::new(&self.config.namespace, &self.config.set);
        self.backend
            .call_procedure(
                &keys.to_backend_key(key),
                procedures::MODULE,
                function,
                arguments,
            )
            .await
            .expect("procedure call succeeds")
    }
}

impl TestUtils {
    /// Create any command from its verb and arguments
    pub fn command(verb: &str, arguments: &[&str]) -> CommandHandler {
        CommandHandler::new(verb, arguments.iter().map(|s| s.to_string()).collect())
    }

    /// Create a GET command
    pub fn get_command(key: &str) -> CommandHandler {
        Self::command("GET", &[key])
    }

    /// Create a SET command
    pub fn set_command(key: &str, value: &str) -> CommandHandler {
        Self::command("SET", &[key, value])
    }

    /// Create a SET command with options
    pub fn set_command_with_options(key: &str, value: &str, options: &[&str]) -> CommandHandler {
        let mut arguments = vec![key, value];
        arguments.extend_from_slice(options);

        Self::command("SET", &arguments)
    }

    /// Create a TTL command
    pub fn ttl_command(key: &str) -> CommandHandler {
        Self::command("TTL", &[key])
    }

    /// Create a PTTL command
    pub fn pttl_command(key: &str) -> CommandHandler {
        Self::command("PTTL", &[key])
    }

    /// Create an EXISTS command
    pub fn exists_command(keys: &[&str]) -> CommandHandler {
        Self::command("EXISTS", keys)
    }

    /// Create an RPUSH command with multiple values
    pub fn rpush_command(key: &str, values: &[&str]) -> CommandHandler {
        let mut arguments = vec![key];
        arguments.extend_from_slice(values);

        Self::command("RPUSH", &arguments)
    }

    /// Create an LPUSH command with multiple values
    pub fn lpush_command(key: &str, values: &[&str]) -> CommandHandler {
        let mut arguments = vec![key];
        arguments.extend_from_slice(values);

        Self::command("LPUSH", &arguments)
    }

    /// Create an LRANGE command
    pub fn lrange_command(key: &str, start: i64, stop: i64) -> CommandHandler {
        Self::command(
            "LRANGE",
            &[key, start.to_string().as_str(), stop.to_string().as_str()],
        )
    }

    /// Create an LLEN command
    pub fn llen_command(key: &str) -> CommandHandler {
        Self::command("LLEN", &[key])
    }

    pub fn expected_ok() -> Reply {
        Reply::ok()
    }

    pub fn expected_integer(number: i64) -> Reply {
        Reply::Integer(number)
    }

    pub fn expected_bulk_string(value: &str) -> Reply {
        Reply::BulkString(value.to_string())
    }

    pub fn expected_null() -> Reply {
        Reply::Null
    }

    pub fn expected_bulk_string_array(values: &[&str]) -> Reply {
        Reply::from_strings(values.iter().map(|s| s.to_string()))
    }

    /// Advance the paused tokio clock
    pub async fn advance_ms(millis: u64) {
        tokio::time::advance(Duration::from_millis(millis)).await;
    }
}
