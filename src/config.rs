use std::time::Duration;

use thiserror::Error;

use crate::reply::Reply;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("unknown connection option '{0}'")]
    UnknownOption(String),
    #[error("invalid value for connection option '{0}'")]
    InvalidOptionValue(String),
}

impl ConfigError {
    pub fn as_string(&self) -> String {
        Reply::Error(format!("ERR {}", self)).encode_to_string()
    }
}

/// Options a client passes when opening a connection.
///
/// | option      | default     |
/// |-------------|-------------|
/// | `host`      | `127.0.0.1` |
/// | `port`      | `3000`      |
/// | `namespace` | `test`      |
/// | `set`       | `test`      |
/// | `bin`       | `redis`     |
/// | `timeout`   | none (ms)   |
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub namespace: String,
    pub set: String,
    pub bin: String,
    pub timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            namespace: "test".to_string(),
            set: "test".to_string(),
            bin: "redis".to_string(),
            timeout: None,
        }
    }
}

impl ConnectionConfig {
    /// Builds a config from `(name, value)` pairs, falling back to defaults
    /// for anything not given. `database` is accepted as an alias of
    /// `namespace`.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = ConnectionConfig::default();

        for (name, value) in options {
            let name = name.as_ref();
            let value = value.as_ref();

            match name {
                "host" => {
                    if value.is_empty() {
                        return Err(ConfigError::InvalidOptionValue(name.to_string()));
                    }
                    config.host = value.to_string();
                }
                "port" => {
                    let port = value
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidOptionValue(name.to_string()))?;

                    if port < 1 {
                        return Err(ConfigError::InvalidOptionValue(name.to_string()));
                    }

                    config.port = port;
                }
                "namespace" | "database" => config.namespace = non_empty(name, value)?,
                "set" => config.set = non_empty(name, value)?,
                "bin" => config.bin = non_empty(name, value)?,
                "timeout" => {
                    let millis = value
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidOptionValue(name.to_string()))?;

                    config.timeout = if millis == 0 {
                        None
                    } else {
                        Some(Duration::from_millis(millis))
                    };
                }
                _ => return Err(ConfigError::UnknownOption(name.to_string())),
            }
        }

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(name: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(ConfigError::InvalidOptionValue(name.to_string()))
    } else {
        Ok(value.to_string())
    }
}
