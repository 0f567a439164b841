// src/db/mod.rs
//! Public façade for DB helpers (re-exports plus spawn_writer).

pub mod connection;
pub mod maintenance;
pub mod writer;

use crate::config::model::DatabaseConfig;
use rusqlite::Connection;
use tokio::{runtime::Runtime, sync::mpsc as async_mpsc};
pub use writer::{BatchInsert, ChangeRow, DbWriter};

/// Spawn a dedicated writer task for rows of type `E`.
pub fn spawn_writer<E>(
    rt: &Runtime,
    conn: Connection,
    rx: async_mpsc::Receiver<E>,
    cfg: &DatabaseConfig,
) where
    E: BatchInsert<E> + Send + 'static,
{
    // Copy what we need so nothing borrowed lives in the async task
    let flush_ms = cfg.flush_interval_ms;
    let batch_sz = cfg.batch_size;

    rt.spawn(async move {
        DbWriter::<E> {
            conn,
            rx,
            flush_interval_ms: flush_ms,
            batch_size: batch_sz,
        }
        .run()
        .await;
    });
}
