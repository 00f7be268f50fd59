//! Core utilities and types shared across all Adpulse crates

pub mod config;
pub mod credential_cipher;
pub mod error;
pub mod plugin;
pub mod problem;
pub mod types;

pub use config::ServerConfig;
pub use credential_cipher::{CipherError, CredentialCipher};
pub use error::*;
pub use problem::Problem;
pub use types::*;

// Re-export external dependencies so downstream crates stay in lockstep
pub use anyhow;
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;
pub use uuid;
