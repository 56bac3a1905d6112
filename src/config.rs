use serde::Deserialize;

use crate::error::{Error, Result};

/// Worker count used when nothing else is configured. Matches the default
/// maximum number of concurrent connections of the underlying transport.
pub const DEFAULT_THREAD_POOL_SIZE: usize = 50;

pub(crate) const DEFAULT_THREAD_NAME_PREFIX: &str = "orgasync-worker";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfiguration {
    /// Maximum number of concurrent connections of the synchronous client.
    pub max_connections: usize,

    pub thread_name_prefix: String,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_THREAD_POOL_SIZE,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl ClientConfiguration {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// How many workers a pool gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolSizing {
    #[default]
    Default,
    MaxConnections(usize),
    Fixed(usize),
}

impl PoolSizing {
    pub fn worker_count(self) -> Result<usize> {
        let n = match self {
            PoolSizing::Default => DEFAULT_THREAD_POOL_SIZE,
            PoolSizing::MaxConnections(n) | PoolSizing::Fixed(n) => n,
        };
        if n == 0 {
            return Err(Error::InvalidPoolSize(n));
        }
        Ok(n)
    }
}

impl From<&ClientConfiguration> for PoolSizing {
    fn from(config: &ClientConfiguration) -> Self {
        PoolSizing::MaxConnections(config.max_connections)
    }
}
