//! Process configuration, read once at startup and injected into services

use crate::{ServiceError, ServiceResult};

pub const DEFAULT_SYNC_SCHEDULE: &str = "0 0 * * * *"; // hourly
pub const DEFAULT_SYNC_BATCH_SIZE: usize = 10;

/// Server configuration assembled at process start.
///
/// The encryption key and scheduler secret are deliberately carried in an
/// explicit struct rather than read from the environment at point of use, so
/// tests can inject distinct secrets without touching process state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub address: String,
    /// Database connection URL
    pub database_url: String,
    /// Process-wide credential encryption secret (32 bytes or 64 hex chars)
    pub encryption_key: String,
    /// Bearer token authenticating the scheduled-trigger endpoint
    pub cron_secret: String,
    /// Cron expression driving the batch sweep
    pub sync_schedule: String,
    /// Maximum number of companies synced concurrently per sweep batch
    pub sync_batch_size: usize,
}

impl ServerConfig {
    /// Builds the configuration from CLI-provided values plus environment
    /// variables. Fails fast on a malformed encryption key or missing cron
    /// secret; both are fatal startup conditions, not recoverable errors.
    pub fn new(address: String, database_url: String) -> ServiceResult<Self> {
        let encryption_key = std::env::var("ADPULSE_ENCRYPTION_KEY").map_err(|_| {
            ServiceError::Configuration {
                message: "ADPULSE_ENCRYPTION_KEY is not set".to_string(),
            }
        })?;
        Self::validate_encryption_key(&encryption_key)?;

        let cron_secret =
            std::env::var("ADPULSE_CRON_SECRET").map_err(|_| ServiceError::Configuration {
                message: "ADPULSE_CRON_SECRET is not set".to_string(),
            })?;

        let sync_schedule = std::env::var("ADPULSE_SYNC_SCHEDULE")
            .unwrap_or_else(|_| DEFAULT_SYNC_SCHEDULE.to_string());

        let sync_batch_size = match std::env::var("ADPULSE_SYNC_BATCH_SIZE") {
            Ok(raw) => raw.parse().map_err(|_| ServiceError::Configuration {
                message: format!("ADPULSE_SYNC_BATCH_SIZE is not a valid number: {}", raw),
            })?,
            Err(_) => DEFAULT_SYNC_BATCH_SIZE,
        };

        Ok(Self {
            address,
            database_url,
            encryption_key,
            cron_secret,
            sync_schedule,
            sync_batch_size,
        })
    }

    fn validate_encryption_key(key: &str) -> ServiceResult<()> {
        let valid = key.len() == 32 || (key.len() == 64 && hex::decode(key).is_ok());
        if valid {
            Ok(())
        } else {
            Err(ServiceError::Configuration {
                message: "ADPULSE_ENCRYPTION_KEY must be exactly 32 bytes or 64 hex characters"
                    .to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_encryption_key_raw() {
        assert!(ServerConfig::validate_encryption_key("12345678901234567890123456789012").is_ok());
    }

    #[test]
    fn test_validate_encryption_key_hex() {
        let key = "a".repeat(64);
        assert!(ServerConfig::validate_encryption_key(&key).is_ok());
    }

    #[test]
    fn test_validate_encryption_key_bad_length() {
        assert!(ServerConfig::validate_encryption_key("too-short").is_err());
    }

    #[test]
    fn test_validate_encryption_key_bad_hex() {
        let key = "z".repeat(64);
        assert!(ServerConfig::validate_encryption_key(&key).is_err());
    }
}
