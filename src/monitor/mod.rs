// src/monitor/mod.rs

//! Snapshot-and-diff engine over the host process table.
//!
//! One cycle enumerates every running process, enriches each with its
//! executable path, creation time and owning session account, and reports
//! which identities appeared or disappeared since the previous cycle.
//! The OS is reached exclusively through the [`system::SystemApi`] trait,
//! so everything here except `windows.rs` runs (and is tested) on any host.

pub mod drives;
pub mod error;
pub mod scanner;
pub mod scheduler;
pub mod session;
pub mod system;
pub mod types;

#[cfg(windows)]
pub mod windows;

pub use error::ScanError;
pub use scanner::Scanner;
pub use types::{ChangeSet, Snapshot};
