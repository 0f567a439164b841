// src/db/writer.rs

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Statement, params};
use std::{
    thread::sleep,
    time::Duration,
};
use thiserror::Error;

/// Defines how to insert a batch of rows of type T
pub trait BatchInsert<T> {
    fn insert_sql() -> &'static str;
    fn bind_params(stmt: &mut Statement<'_>, record: &T) -> rusqlite::Result<()>;
}

/// One persisted scan cycle's change set: a timestamp, the new/closed
/// counts for cheap inspection, and the full JSON payload.
#[derive(Debug, Clone)]
pub struct ChangeRow {
    pub ts: DateTime<Utc>,
    pub new_count: usize,
    pub closed_count: usize,
    pub payload: String,
}

impl BatchInsert<ChangeRow> for ChangeRow {
    fn insert_sql() -> &'static str {
        "INSERT INTO process_changes (ts, new_count, closed_count, payload) \
         VALUES (?1, ?2, ?3, ?4)"
    }

    fn bind_params(stmt: &mut Statement<'_>, rec: &ChangeRow) -> rusqlite::Result<()> {
        stmt.execute(params![
            rec.ts.timestamp_micros(),
            rec.new_count as i64,
            rec.closed_count as i64,
            rec.payload,
        ])?;
        Ok(())
    }
}

/// A batched writer for SQLite.
/// Performs all DB work synchronously to avoid holding &Connection across .await.
pub struct DbWriter<T> {
    pub conn: Connection,
    pub rx: tokio::sync::mpsc::Receiver<T>,
    pub flush_interval_ms: u64,
    pub batch_size: usize,
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl<T> DbWriter<T>
where
    T: Send + 'static,
{
    /// Start the writer loop; call inside tokio::spawn.
    pub async fn run(mut self)
    where
        T: BatchInsert<T>,
    {
        let mut buffer = Vec::with_capacity(self.batch_size);
        let mut interval = tokio::time::interval(Duration::from_millis(self.flush_interval_ms));

        loop {
            tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(row) => {
                        buffer.push(row);
                        if buffer.len() >= self.batch_size {
                            self.flush_logged(&mut buffer);
                        }
                    }
                    None => {
                        self.flush_logged(&mut buffer);
                        break;
                    }
                },
                _ = interval.tick() => {
                    self.flush_logged(&mut buffer);
                }
            }
        }
    }

    /// Flush and log; a store failure is never retried by the scan loop and
    /// never rolls anything back.
    fn flush_logged(&mut self, buffer: &mut Vec<T>)
    where
        T: BatchInsert<T>,
    {
        if let Err(e) = self.flush_sync(buffer) {
            log::error!("change-set store failed, {} row(s) dropped: {e}", buffer.len());
            buffer.clear();
        }
    }

    /// Synchronous flush with retry + backoff on lock contention.
    fn flush_sync(&mut self, buffer: &mut Vec<T>) -> Result<(), DbError>
    where
        T: BatchInsert<T>,
    {
        let mut attempts = 0;

        while !buffer.is_empty() {
            match self.conn.transaction() {
                Ok(tx) => {
                    {
                        let mut stmt = tx.prepare_cached(T::insert_sql())?;
                        for rec in buffer.drain(..) {
                            T::bind_params(&mut stmt, &rec)?;
                        }
                    }
                    tx.commit()?;
                }
                Err(e) if e.to_string().contains("database is locked") && attempts < 5 => {
                    attempts += 1;
                    sleep(Duration::from_millis(50 * attempts));
                }
                Err(e) => return Err(DbError::Sql(e)),
            }
        }
        Ok(())
    }
}
