// src/monitor/windows.rs

//! Win32 implementation of the `SystemApi` capability surface.
//!
//! One `WinSystemApi` value is constructed at process start and passed into
//! the scanner; every Win32 entry point is reached through it rather than
//! as ambient global state. Each method maps a failed call to
//! `io::Error::last_os_error()` and leaves the skip/fatal policy to the
//! scanner.

use crate::monitor::system::{SessionInfo, SystemApi};
use crate::monitor::types::ProcessTimes;
use std::{ffi::OsStr, io, mem::size_of, os::windows::prelude::OsStrExt, ptr};
use windows_sys::Win32::{
    Foundation::{
        CloseHandle, ERROR_INSUFFICIENT_BUFFER, FILETIME, GetLastError, HANDLE, LocalFree,
    },
    Security::{Authorization::ConvertSidToStringSidW, LookupAccountNameW, SID_NAME_USE},
    Storage::FileSystem::{GetLogicalDriveStringsW, QueryDosDeviceW},
    System::ProcessStatus::K32EnumProcesses,
    System::RemoteDesktop::{
        ProcessIdToSessionId, WTSFreeMemory, WTSINFOW, WTSQuerySessionInformationW,
        WTSSessionInfo,
    },
    System::Threading::{
        GetProcessTimes, OpenProcess, PROCESS_NAME_NATIVE, PROCESS_QUERY_INFORMATION,
        QueryFullProcessImageNameW,
    },
};
use windows_sys::core::PWSTR;

/// EnumProcesses cannot report "more": it just fills what fits. This is
/// capacity for 65 535 pids, far beyond a realistic process table.
const PID_CAPACITY: usize = 65_535;
/// Native device paths are not subject to MAX_PATH.
const LONG_PATH_CAPACITY: usize = 32_768;

/// Capability handle over the live Win32 surface.
#[derive(Debug, Default)]
pub struct WinSystemApi;

impl WinSystemApi {
    pub fn new() -> Self {
        WinSystemApi
    }
}

/// Null-terminated UTF-16 for Win32 input strings.
fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

/// Decode a fixed UTF-16 array up to its first NUL.
fn utf16_nul_to_string(words: &[u16]) -> String {
    let end = words.iter().position(|&c| c == 0).unwrap_or(words.len());
    String::from_utf16_lossy(&words[..end])
}

/// Decode a NUL-terminated UTF-16 string the OS allocated for us.
unsafe fn pwstr_to_string(p: PWSTR) -> String {
    let mut len = 0usize;
    while unsafe { *p.add(len) } != 0 {
        len += 1;
    }
    String::from_utf16_lossy(unsafe { std::slice::from_raw_parts(p, len) })
}

fn filetime_ticks(ft: &FILETIME) -> i64 {
    ((ft.dwHighDateTime as i64) << 32) | ft.dwLowDateTime as i64
}

impl SystemApi for WinSystemApi {
    type Handle = HANDLE;

    fn list_process_ids(&self) -> io::Result<Vec<u32>> {
        let mut pids = vec![0u32; PID_CAPACITY];
        let mut returned: u32 = 0;
        let ok = unsafe {
            K32EnumProcesses(
                pids.as_mut_ptr(),
                (pids.len() * size_of::<u32>()) as u32,
                &mut returned,
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        pids.truncate(returned as usize / size_of::<u32>());
        Ok(pids)
    }

    fn open_handle(&self, pid: u32) -> io::Result<HANDLE> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid) };
        if handle.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(handle)
    }

    fn close_handle(&self, handle: &HANDLE) -> io::Result<()> {
        if unsafe { CloseHandle(*handle) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn query_image_path(&self, handle: &HANDLE) -> io::Result<String> {
        // Native device form: the win32 form errors out for a process that
        // has already exited, the device form does not.
        let mut buf = vec![0u16; LONG_PATH_CAPACITY];
        let mut len = buf.len() as u32;
        let ok = unsafe {
            QueryFullProcessImageNameW(*handle, PROCESS_NAME_NATIVE, buf.as_mut_ptr(), &mut len)
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(String::from_utf16_lossy(&buf[..len as usize]))
    }

    fn query_process_times(&self, handle: &HANDLE) -> io::Result<ProcessTimes> {
        let zero = FILETIME {
            dwLowDateTime: 0,
            dwHighDateTime: 0,
        };
        let (mut creation, mut exit, mut kernel, mut user) = (zero, zero, zero, zero);
        let ok = unsafe {
            GetProcessTimes(*handle, &mut creation, &mut exit, &mut kernel, &mut user)
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ProcessTimes {
            creation: filetime_ticks(&creation),
            exit: filetime_ticks(&exit),
            kernel: filetime_ticks(&kernel),
            user: filetime_ticks(&user),
        })
    }

    fn session_id_for_pid(&self, pid: u32) -> io::Result<u32> {
        let mut session_id = 0u32;
        if unsafe { ProcessIdToSessionId(pid, &mut session_id) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(session_id)
    }

    fn query_session_info(&self, session_id: u32) -> io::Result<SessionInfo> {
        let mut buf: PWSTR = ptr::null_mut();
        let mut bytes: u32 = 0;
        // Null server handle == WTS_CURRENT_SERVER_HANDLE (the local host).
        let ok = unsafe {
            WTSQuerySessionInformationW(
                ptr::null_mut(),
                session_id,
                WTSSessionInfo,
                &mut buf,
                &mut bytes,
            )
        };
        if ok == 0 || buf.is_null() {
            return Err(io::Error::last_os_error());
        }
        let info = unsafe { &*(buf as *const WTSINFOW) };
        let session = SessionInfo {
            user_name: utf16_nul_to_string(&info.UserName),
            logon_time: info.LogonTime,
        };
        unsafe { WTSFreeMemory(buf.cast()) };
        Ok(session)
    }

    fn account_lookup(&self, account: &str) -> io::Result<String> {
        let name = to_wide(account);
        let mut sid_len: u32 = 0;
        let mut domain_len: u32 = 0;
        let mut use_kind: SID_NAME_USE = 0;

        // First call sizes the SID and domain buffers.
        unsafe {
            LookupAccountNameW(
                ptr::null(),
                name.as_ptr(),
                ptr::null_mut(),
                &mut sid_len,
                ptr::null_mut(),
                &mut domain_len,
                &mut use_kind,
            );
        }
        if unsafe { GetLastError() } != ERROR_INSUFFICIENT_BUFFER {
            return Err(io::Error::last_os_error());
        }

        let mut sid = vec![0u8; sid_len as usize];
        let mut domain = vec![0u16; domain_len as usize];
        let ok = unsafe {
            LookupAccountNameW(
                ptr::null(),
                name.as_ptr(),
                sid.as_mut_ptr().cast(),
                &mut sid_len,
                domain.as_mut_ptr(),
                &mut domain_len,
                &mut use_kind,
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        let mut sid_str: PWSTR = ptr::null_mut();
        let ok = unsafe { ConvertSidToStringSidW(sid.as_mut_ptr().cast(), &mut sid_str) };
        if ok == 0 || sid_str.is_null() {
            return Err(io::Error::last_os_error());
        }
        let out = unsafe { pwstr_to_string(sid_str) };
        unsafe { LocalFree(sid_str.cast()) };
        Ok(out)
    }

    fn enumerate_logical_drives(&self) -> io::Result<Vec<String>> {
        let mut buf = vec![0u16; 1_024];
        let len = unsafe { GetLogicalDriveStringsW(buf.len() as u32, buf.as_mut_ptr()) };
        if len == 0 {
            return Err(io::Error::last_os_error());
        }
        // A return larger than the buffer is the required-size signal.
        if len as usize > buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "drive string list exceeds buffer",
            ));
        }
        // Buffer holds "C:\<nul>D:\<nul><nul>".
        let mut drives = Vec::new();
        for chunk in buf[..len as usize].split(|&c| c == 0) {
            if chunk.is_empty() {
                continue;
            }
            let mut drive = String::from_utf16_lossy(chunk);
            // QueryDosDevice wants the bare "C:" form.
            if drive.ends_with('\\') {
                drive.pop();
            }
            drives.push(drive);
        }
        Ok(drives)
    }

    fn query_device_target(&self, drive: &str) -> io::Result<String> {
        let name = to_wide(drive);
        let mut target = vec![0u16; 1_024];
        let len =
            unsafe { QueryDosDeviceW(name.as_ptr(), target.as_mut_ptr(), target.len() as u32) };
        if len == 0 {
            return Err(io::Error::last_os_error());
        }
        // Double-NUL-terminated list; the first entry is the live mapping.
        Ok(utf16_nul_to_string(&target))
    }
}
