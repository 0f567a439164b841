// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `default.toml`, deserializes into `MasterConfig`, and converts
//! the raw `[monitor]` table into runtime `MonitorSettings`.

use crate::config::model::{ConfigError, MasterConfig, MonitorConfig, MonitorSettings};
use std::{fs, path::Path};

/// Load and parse the master configuration from `path`.
/// A missing file is not an error: every table has defaults.
pub fn load_master_config(path: &Path) -> Result<MasterConfig, ConfigError> {
    if !path.exists() {
        log::warn!("No config at {:?}, using built-in defaults", path);
        return Ok(MasterConfig::default());
    }
    log::debug!("Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg: MasterConfig = toml::from_str(&txt)?;
    log::info!("Loaded config from {:?}", path);
    Ok(cfg)
}

/// Convert the raw `[monitor]` table into runtime settings.
pub fn monitor_settings(cfg: &MonitorConfig) -> Result<MonitorSettings, ConfigError> {
    let interval = humantime::parse_duration(&cfg.interval)
        .map_err(|e| ConfigError::InvalidDuration(cfg.interval.clone(), e))?;
    Ok(MonitorSettings {
        interval,
        translate_drive_letters: cfg.translate_drive_letters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: MasterConfig = toml::from_str(
            r#"
            [logging]
            enable = true
            file = "monitor.log"
            level = "DEBUG"

            [database]
            path = "foo.db"
            flush_interval_ms = 100

            [monitor]
            interval = "500ms"
            translate_drive_letters = false
            "#,
        )
        .unwrap();

        assert!(cfg.logging.enable);
        assert_eq!(cfg.database.path, "foo.db");
        assert_eq!(cfg.database.flush_interval_ms, 100);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.database.synchronous, "NORMAL");

        let settings = monitor_settings(&cfg.monitor).unwrap();
        assert_eq!(settings.interval, std::time::Duration::from_millis(500));
        assert!(!settings.translate_drive_letters);
    }

    #[test]
    fn rejects_bad_interval() {
        let monitor = MonitorConfig {
            interval: "not-a-duration".into(),
            ..MonitorConfig::default()
        };
        assert!(matches!(
            monitor_settings(&monitor),
            Err(ConfigError::InvalidDuration(_, _))
        ));
    }
}
