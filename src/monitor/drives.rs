// src/monitor/drives.rs

//! Logical drive table: native device prefixes to drive letters.

use crate::monitor::error::ScanError;
use crate::monitor::system::SystemApi;
use crate::monitor::types::DriveTable;

/// Segments forming a device prefix, counting the empty segment before the
/// leading backslash: `["", "Device", "HarddiskVolume3"]`.
const DEVICE_PREFIX_SEGMENTS: usize = 3;

/// Build a fresh drive table. Called once per cycle: drive assignments are
/// not guaranteed stable, and the enumeration is cheap relative to a cycle.
pub fn build_drive_table<S: SystemApi>(api: &S) -> Result<DriveTable, ScanError> {
    let drives = api
        .enumerate_logical_drives()
        .map_err(ScanError::DriveTable)?;
    let mut table = DriveTable::with_capacity(drives.len());
    for drive in drives {
        let target = api
            .query_device_target(&drive)
            .map_err(ScanError::DriveTable)?;
        table.insert(target, drive);
    }
    Ok(table)
}

/// Rewrite a native device path to drive-letter form when its device prefix
/// is present in `table`. Paths that do not match (network drives, unmounted
/// volumes, malformed input) fall back to the native form unchanged;
/// translation is display enrichment, never a correctness requirement.
pub fn translate_to_drive_letter(native: &str, table: &DriveTable) -> String {
    let parts: Vec<&str> = native.splitn(DEVICE_PREFIX_SEGMENTS + 1, '\\').collect();
    if parts.len() < DEVICE_PREFIX_SEGMENTS {
        return native.to_owned();
    }
    let prefix = parts[..DEVICE_PREFIX_SEGMENTS].join("\\");
    match table.get(&prefix) {
        Some(letter) => format!("{}{}", letter, &native[prefix.len()..]),
        None => native.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DriveTable {
        DriveTable::from([(r"\Device\HarddiskVolume3".to_owned(), "C:".to_owned())])
    }

    #[test]
    fn rewrites_known_device_prefix() {
        assert_eq!(
            translate_to_drive_letter(r"\Device\HarddiskVolume3\Windows\cmd.exe", &table()),
            r"C:\Windows\cmd.exe"
        );
    }

    #[test]
    fn unknown_prefix_falls_back_to_native_path() {
        let native = r"\Device\HarddiskVolume9\Windows\cmd.exe";
        assert_eq!(translate_to_drive_letter(native, &table()), native);
    }

    #[test]
    fn bare_volume_path_maps_to_bare_letter() {
        assert_eq!(
            translate_to_drive_letter(r"\Device\HarddiskVolume3", &table()),
            "C:"
        );
    }

    #[test]
    fn short_path_is_left_alone() {
        assert_eq!(translate_to_drive_letter(r"\Device", &table()), r"\Device");
        assert_eq!(translate_to_drive_letter("", &table()), "");
    }
}
