// src/monitor/types.rs

//! Data model for snapshots and change sets.
//!
//! Records serialize to the JSON shape consumed by the persistence sink:
//! camelCase field names, change sets as `{"new": [...], "closed": [...]}`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Composite process key. The OS recycles pids, so a pid alone cannot
/// distinguish two process instances; the creation timestamp does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessIdentity {
    pub pid: u32,
    #[serde(rename = "creationTime")]
    pub creation_time: String,
}

/// Account owning the session a process runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwningUser {
    #[serde(rename = "sessionID")]
    pub session_id: u32,
    pub name: String,
    pub sid: String,
    #[serde(rename = "lastLogin")]
    pub last_login: String,
}

/// Fully resolved per-process record. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(flatten)]
    pub identity: ProcessIdentity,
    pub name: String,
    #[serde(rename = "mainModulePath")]
    pub main_module_path: String,
    #[serde(rename = "owningUser")]
    pub owning_user: OwningUser,
}

/// Complete mapping of process identities to records for one cycle.
/// A cycle never mutates its input snapshot; it builds a fresh one.
pub type Snapshot = HashMap<ProcessIdentity, ProcessRecord>;

/// Processes that appeared / disappeared between two snapshots.
///
/// The identity sets of `new` and `closed` are disjoint; ordering within
/// each list follows OS enumeration order for that cycle and is not stable
/// across cycles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub new: Vec<ProcessRecord>,
    pub closed: Vec<ProcessRecord>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.closed.is_empty()
    }
}

/// Raw process times as reported by the OS, in FILETIME ticks
/// (100 ns units since 1601-01-01 UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTimes {
    pub creation: i64,
    pub exit: i64,
    pub kernel: i64,
    pub user: i64,
}

/// Per-cycle mapping from native device prefixes (`\Device\HarddiskVolume3`)
/// to drive letters (`C:`). Rebuilt every cycle; mounts can change.
pub type DriveTable = HashMap<String, String>;
