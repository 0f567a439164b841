// src/config/model.rs

//! Configuration structures for the monitor.
//!
//! Distinguishes between the raw TOML format (`MasterConfig` and its
//! tables) and the runtime representation handed to the scan loop
//! (`MonitorSettings`).

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Top-level config as deserialized from `default.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct MasterConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Mirror of the `[logging]` table
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable: bool,
    pub file: Option<String>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enable: false,
            file: None,
            level: "INFO".into(),
        }
    }
}

/// Mirror of the `[database]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub purge_on_restart: bool,
    pub synchronous: String,
    pub journal_size_limit: u64,
    pub checkpoint_seconds: u64,
    pub ttl_seconds: u64,
    pub flush_interval_ms: u64,
    pub batch_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: "changes.db".into(),
            purge_on_restart: false,
            synchronous: "NORMAL".into(),
            journal_size_limit: 50_000_000,
            checkpoint_seconds: 300,
            ttl_seconds: 0,
            flush_interval_ms: 250,
            batch_size: 256,
        }
    }
}

/// Mirror of the `[monitor]` table
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Target cycle interval, humantime form ("1s", "500ms").
    pub interval: String,
    /// Rewrite native device paths to drive-letter form when possible.
    pub translate_drive_letters: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            interval: "1s".into(),
            translate_drive_letters: true,
        }
    }
}

/// Fully-typed monitor settings used at runtime.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub translate_drive_letters: bool,
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
