// src/monitor/session.rs

//! Session-to-account resolution.

use crate::monitor::error::ScanError;
use crate::monitor::system::{SystemApi, filetime_to_utc, format_timestamp};
use crate::monitor::types::OwningUser;

/// Well-known SID of the LocalSystem account.
const LOCAL_SYSTEM_SID: &str = "S-1-5-18";
/// Session 0 hosts services and has no interactively logged-in account.
const LOCAL_SYSTEM_SESSION_ID: u32 = 0;

/// Resolve the account owning `session_id`.
///
/// Session 0 short-circuits to the fixed LocalSystem identity without any
/// OS lookup: querying it as a user session would fail or mislead. For all
/// other sessions, a failure in the session-info query or the account
/// lookup is fatal to the cycle; the usual cause is a session torn down
/// between enumeration and lookup, and the next cycle simply retries.
pub fn resolve_owning_user<S: SystemApi>(
    api: &S,
    session_id: u32,
) -> Result<OwningUser, ScanError> {
    if session_id == LOCAL_SYSTEM_SESSION_ID {
        return Ok(OwningUser {
            session_id,
            name: "LocalSystem".into(),
            sid: LOCAL_SYSTEM_SID.into(),
            last_login: String::new(),
        });
    }

    let info = api
        .query_session_info(session_id)
        .map_err(|source| ScanError::SessionInfo { session_id, source })?;
    let sid = api
        .account_lookup(&info.user_name)
        .map_err(|source| ScanError::AccountLookup {
            account: info.user_name.clone(),
            source,
        })?;

    Ok(OwningUser {
        session_id,
        name: info.user_name,
        sid,
        last_login: format_timestamp(filetime_to_utc(info.logon_time)),
    })
}
