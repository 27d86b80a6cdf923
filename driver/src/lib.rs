use std::str::FromStr;

use crate::error::DriverError;

pub mod config;
pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> Result<String, DriverError> {
    dotenvy::var(key).map_err(DriverError::from)
}

/// Reads and parses `key`, falling back to `default` when it is unset.
pub fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, DriverError> {
    match dotenvy::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| DriverError::Config(format!("{key} has an invalid value: {raw:?}"))),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(DriverError::from(error)),
    }
}
