use std::net::SocketAddr;
use std::path::PathBuf;

use driver::config::DatabaseConfig;
use driver::env_or;
use driver::error::ConvertError;
use kernel::KernelError;

static SERVER_ADDR: &str = "SERVER_ADDR";
static LOG_DIR: &str = "LOG_DIR";
static RUN_MIGRATIONS: &str = "RUN_MIGRATIONS";

/// Process settings, read once before anything else starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub addr: SocketAddr,
    pub log_dir: PathBuf,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            addr: env_or(SERVER_ADDR, SocketAddr::from(([0, 0, 0, 0], 8080))).convert_error()?,
            log_dir: env_or(LOG_DIR, PathBuf::from("./logs")).convert_error()?,
            run_migrations: env_or(RUN_MIGRATIONS, false).convert_error()?,
        })
    }
}
