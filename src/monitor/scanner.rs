// src/monitor/scanner.rs

//! The snapshot-and-diff engine.
//!
//! One `scan` call is a pure function of the previous snapshot: it builds
//! the current snapshot from scratch and computes the change set inline
//! while doing so, without materializing two snapshots before diffing.

use crate::monitor::drives::{build_drive_table, translate_to_drive_letter};
use crate::monitor::error::ScanError;
use crate::monitor::session::resolve_owning_user;
use crate::monitor::system::{SystemApi, filetime_to_utc, format_timestamp};
use crate::monitor::types::{ChangeSet, DriveTable, ProcessIdentity, ProcessRecord, Snapshot};

/// Snapshot builder over one OS capability surface.
pub struct Scanner<S: SystemApi> {
    api: S,
    translate_paths: bool,
}

impl<S: SystemApi> Scanner<S> {
    pub fn new(api: S) -> Self {
        Self::with_translation(api, true)
    }

    pub fn with_translation(api: S, translate_paths: bool) -> Self {
        Scanner {
            api,
            translate_paths,
        }
    }

    /// Build a fresh snapshot and the change set relative to `previous`.
    ///
    /// `previous` is read-only input. On error the partially built snapshot
    /// is discarded and the caller must keep `previous` as its baseline, so
    /// a failed cycle can never produce spurious `closed` entries.
    pub fn scan(&self, previous: &Snapshot) -> Result<(Snapshot, ChangeSet), ScanError> {
        let drive_table = if self.translate_paths {
            build_drive_table(&self.api)?
        } else {
            DriveTable::new()
        };
        let pids = self.api.list_process_ids().map_err(ScanError::Enumerate)?;

        let mut current = Snapshot::with_capacity(pids.len());
        let mut changes = ChangeSet::default();

        for pid in pids {
            let handle = match self.api.open_handle(pid) {
                Ok(h) => h,
                // The process exited between enumeration and open, or it is
                // protected. Expected churn: drop the pid for this cycle.
                Err(e) => {
                    log::debug!("skipping pid {pid}: {e}");
                    continue;
                }
            };
            // The guard releases the handle on every exit path of this
            // body, including the early returns below.
            let guard = HandleGuard::new(&self.api, handle);
            let record = self.resolve_record(pid, guard.handle(), &drive_table)?;

            let identity = record.identity.clone();
            if !previous.contains_key(&identity) {
                changes.new.push(record.clone());
            }
            current.insert(identity, record);
        }

        // Second pass: identities present before but absent now are closed.
        // A reused pid with a different creation time lands in both lists.
        for (identity, record) in previous {
            if !current.contains_key(identity) {
                changes.closed.push(record.clone());
            }
        }

        Ok((current, changes))
    }

    /// Resolve one enriched record from an open handle. Any failure past a
    /// successful open is fatal to the cycle: a half-enriched record would
    /// corrupt the snapshot's meaning.
    fn resolve_record(
        &self,
        pid: u32,
        handle: &S::Handle,
        drive_table: &DriveTable,
    ) -> Result<ProcessRecord, ScanError> {
        let native_path = self
            .api
            .query_image_path(handle)
            .map_err(|source| ScanError::ImagePath { pid, source })?;
        let times = self
            .api
            .query_process_times(handle)
            .map_err(|source| ScanError::ProcessTimes { pid, source })?;
        let session_id = self
            .api
            .session_id_for_pid(pid)
            .map_err(|source| ScanError::SessionId { pid, source })?;
        let owning_user = resolve_owning_user(&self.api, session_id)?;

        let main_module_path = if self.translate_paths {
            translate_to_drive_letter(&native_path, drive_table)
        } else {
            native_path
        };
        let name = main_module_path
            .rsplit('\\')
            .next()
            .unwrap_or_default()
            .to_owned();
        let creation_time = format_timestamp(filetime_to_utc(times.creation));

        Ok(ProcessRecord {
            identity: ProcessIdentity { pid, creation_time },
            name,
            main_module_path,
            owning_user,
        })
    }
}

/// Scoped handle release: the per-pid body can exit through `?` at any
/// resolution step and the handle still goes back to the OS.
struct HandleGuard<'a, S: SystemApi> {
    api: &'a S,
    handle: S::Handle,
}

impl<'a, S: SystemApi> HandleGuard<'a, S> {
    fn new(api: &'a S, handle: S::Handle) -> Self {
        HandleGuard { api, handle }
    }

    fn handle(&self) -> &S::Handle {
        &self.handle
    }
}

impl<S: SystemApi> Drop for HandleGuard<'_, S> {
    fn drop(&mut self) {
        // A release failure means the OS handle table can no longer be
        // reasoned about; halt instead of continuing with corrupt state.
        if let Err(e) = self.api.close_handle(&self.handle) {
            log::error!("process handle release failed: {e}");
            panic!("process handle release failed: {e}");
        }
    }
}
