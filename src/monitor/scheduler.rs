// src/monitor/scheduler.rs

//! Periodic scan loop.
//!
//! Glue around the core: run one cycle, hand any changes to the async
//! writer, then sleep whatever is left of the target interval. Cycles
//! never overlap; an overrun starts the next scan immediately.

use crate::db::writer::ChangeRow;
use crate::monitor::scanner::Scanner;
use crate::monitor::system::SystemApi;
use crate::monitor::types::Snapshot;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Sender;

pub fn run_monitor<S: SystemApi>(scanner: Scanner<S>, interval: Duration, tx: Sender<ChangeRow>) {
    let mut previous = Snapshot::new();

    loop {
        let started = Instant::now();

        match scanner.scan(&previous) {
            Ok((current, changes)) => {
                if !changes.is_empty() {
                    log::info!(
                        "{} new, {} closed process(es)",
                        changes.new.len(),
                        changes.closed.len()
                    );
                    match serde_json::to_string(&changes) {
                        Ok(payload) => {
                            let row = ChangeRow {
                                ts: chrono::Utc::now(),
                                new_count: changes.new.len(),
                                closed_count: changes.closed.len(),
                                payload,
                            };
                            // Best effort: a full queue or a stopped writer
                            // must not stall the next cycle.
                            if let Err(e) = tx.try_send(row) {
                                log::warn!("change set dropped: {e}");
                            }
                        }
                        Err(e) => log::error!("change set serialization failed: {e}"),
                    }
                }
                previous = current;
            }
            // The previous snapshot stays in place as the next baseline, so
            // a failed cycle produces no spurious closed entries.
            Err(e) => log::error!("scan cycle failed: {e}"),
        }

        let elapsed = started.elapsed();
        log::debug!(
            "cycle took {:?}, tracking {} process(es)",
            elapsed,
            previous.len()
        );
        match interval.checked_sub(elapsed) {
            Some(rest) => std::thread::sleep(rest),
            None => log::warn!(
                "cycle overran the {:?} interval, starting the next scan immediately",
                interval
            ),
        }
    }
}
