// src/monitor/error.rs

use std::io;
use thiserror::Error;

/// Fatal cycle errors.
///
/// A scan cycle aborts on the first of these and discards its partially
/// built snapshot; the caller keeps the prior snapshot as the baseline for
/// the next attempt. Handle-open failures are deliberately absent: those
/// are benign churn and only skip the one pid.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("process enumeration failed: {0}")]
    Enumerate(#[source] io::Error),

    #[error("drive table construction failed: {0}")]
    DriveTable(#[source] io::Error),

    #[error("image path query failed for pid {pid}: {source}")]
    ImagePath {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("process times query failed for pid {pid}: {source}")]
    ProcessTimes {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("session id lookup failed for pid {pid}: {source}")]
    SessionId {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("session info query failed for session {session_id}: {source}")]
    SessionInfo {
        session_id: u32,
        #[source]
        source: io::Error,
    },

    #[error("account lookup failed for '{account}': {source}")]
    AccountLookup {
        account: String,
        #[source]
        source: io::Error,
    },
}
