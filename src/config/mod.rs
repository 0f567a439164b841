//! Public API for configuration

pub mod loader;
pub mod model;

// Re-export the main entrypoints:
pub use loader::{load_master_config, monitor_settings};
pub use model::MasterConfig;
