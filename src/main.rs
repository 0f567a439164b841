// src/main.rs

//! Monitor entry-point (console process).
//!
//! 1. Parse configuration & set up structured logging
//! 2. Initialise SQLite (WAL) and spawn the async change writer
//! 3. Run the scan loop on the main thread until killed
//!
// ───── std / 3rd-party imports ──────────────────────────────────────────────
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process, thread,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc as async_mpsc;

// ───── local imports ────────────────────────────────────────────────────────
use procwatch::config::model::MasterConfig;
use procwatch::config::{load_master_config, monitor_settings};
use procwatch::db::connection::{db_path, init_database};
use procwatch::db::maintenance::{spawn_ttl_cleanup, spawn_wal_maintenance};
use procwatch::db::writer::ChangeRow;
use procwatch::db::spawn_writer;
#[cfg(windows)]
use procwatch::monitor::{Scanner, scheduler::run_monitor, windows::WinSystemApi};

// ───── helpers ──────────────────────────────────────────────────────────────

/// Print an error with context and terminate the process.
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(1);
    }};
}

/// Directory that contains the running executable.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .expect("Cannot determine exe path")
        .parent()
        .expect("Executable must live in some directory")
        .to_path_buf()
}

/// Configure global logging as requested in `master.logging`.
fn setup_logging(exe_dir: &Path, master: &MasterConfig) -> Result<(), fern::InitError> {
    let level = match master.logging.level.to_uppercase().as_str() {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let log_path = master
        .logging
        .enable
        .then(|| exe_dir.join(master.logging.file.as_deref().unwrap_or("procwatch.log")));

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

fn main() {
    // 1 ─ Context
    let exe_dir = exe_dir();
    let master = load_master_config(&exe_dir.join("default.toml"))
        .unwrap_or_else(|e| fatal!("config", "{}", e));

    // 2 ─ Logging
    setup_logging(&exe_dir, &master).expect("Logging setup failed");
    log::info!("Monitor bootstrap initiated");

    let settings =
        monitor_settings(&master.monitor).unwrap_or_else(|e| fatal!("config", "{}", e));

    // 3 ─ Database & writer
    let conn = init_database(&exe_dir, &master.database)
        .unwrap_or_else(|e| fatal!("database", "{}", e));

    let rt = Runtime::new().expect("Tokio runtime creation failed");
    let (tx, rx) = async_mpsc::channel::<ChangeRow>(1_000);
    spawn_writer(&rt, conn, rx, &master.database);

    let db_file = db_path(&exe_dir, &master.database);
    spawn_ttl_cleanup(&rt, db_file.clone(), &master.database);
    spawn_wal_maintenance(&rt, db_file, &master.database);

    // 4 ─ Scan loop
    #[cfg(windows)]
    {
        let scanner =
            Scanner::with_translation(WinSystemApi::new(), settings.translate_drive_letters);
        log::info!("Scanning every {:?}", settings.interval);
        run_monitor(scanner, settings.interval, tx);
    }

    #[cfg(not(windows))]
    {
        let _ = (settings, tx);
        fatal!("monitor", "this monitor only runs on Windows hosts");
    }
}
