use std::time::Duration;

use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

static POSTGRES_URL: &str = "POSTGRES_URL";
static POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
static STORE_TIMEOUT_MS: &str = "STORE_TIMEOUT_MS";

/// Entity store settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    url: String,
    max_connections: u32,
    operation_timeout: Duration,
}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

    pub fn new(url: impl Into<String>, max_connections: u32, operation_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            max_connections,
            operation_timeout,
        }
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL).convert_error()?;
        let max_connections =
            env_or(POSTGRES_MAX_CONNECTIONS, Self::DEFAULT_MAX_CONNECTIONS).convert_error()?;
        let timeout_ms = env_or(
            STORE_TIMEOUT_MS,
            Self::DEFAULT_TIMEOUT.as_millis() as u64,
        )
        .convert_error()?;
        Ok(Self::new(
            url,
            max_connections,
            Duration::from_millis(timeout_ms),
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Bound applied to every store call, pool acquisition included.
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}
