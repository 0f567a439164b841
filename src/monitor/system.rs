// src/monitor/system.rs

//! The synchronous OS capability surface consumed by the scanner.
//!
//! The production implementation ([`crate::monitor::windows::WinSystemApi`])
//! wraps the live Win32 calls and is constructed once at process start;
//! tests substitute an in-memory fake. None of these calls block
//! indefinitely or support cancellation.

use crate::monitor::types::ProcessTimes;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io;

/// Session attributes as reported by the OS session-info query.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_name: String,
    /// Logon time in FILETIME ticks.
    pub logon_time: i64,
}

pub trait SystemApi {
    /// Opaque query-only process handle; released through `close_handle`.
    type Handle;

    /// List every active process id. No ordering guarantee.
    fn list_process_ids(&self) -> io::Result<Vec<u32>>;

    /// Open a query-only handle for `pid`. Failure here is expected churn
    /// (the process already exited, or access is denied to a protected
    /// process) and makes the scanner drop the pid for this cycle.
    fn open_handle(&self, pid: u32) -> io::Result<Self::Handle>;

    /// Release a handle obtained from `open_handle`. Failure indicates
    /// OS-level handle-table inconsistency and is treated as unrecoverable.
    fn close_handle(&self, handle: &Self::Handle) -> io::Result<()>;

    /// Executable path in native device form (`\Device\HarddiskVolume3\...`).
    fn query_image_path(&self, handle: &Self::Handle) -> io::Result<String>;

    /// Creation/exit/kernel/user times for an open handle.
    fn query_process_times(&self, handle: &Self::Handle) -> io::Result<ProcessTimes>;

    /// Session the process belongs to.
    fn session_id_for_pid(&self, pid: u32) -> io::Result<u32>;

    /// User name and logon time for a session.
    fn query_session_info(&self, session_id: u32) -> io::Result<SessionInfo>;

    /// String SID for an account name.
    fn account_lookup(&self, account: &str) -> io::Result<String>;

    /// Assigned drive roots without trailing backslash (`C:`).
    fn enumerate_logical_drives(&self) -> io::Result<Vec<String>>;

    /// Raw device target a drive root maps to (`\Device\HarddiskVolume3`).
    fn query_device_target(&self, drive: &str) -> io::Result<String>;
}

/// Offset between the FILETIME epoch (1601-01-01) and the UNIX epoch,
/// in 100 ns ticks.
const FILETIME_UNIX_EPOCH_DIFF: i64 = 116_444_736_000_000_000;

/// Convert FILETIME ticks to a UTC timestamp.
pub fn filetime_to_utc(ticks: i64) -> DateTime<Utc> {
    let unix_ticks = ticks - FILETIME_UNIX_EPOCH_DIFF;
    let secs = unix_ticks.div_euclid(10_000_000);
    let nanos = (unix_ticks.rem_euclid(10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::UNIX_EPOCH)
}

/// RFC 3339 at seconds precision with a `Z` suffix, the form used in
/// `ProcessIdentity` keys and persisted records.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
