pub mod sqlite;

use crate::attendee::AttendeeRecord;

#[derive(Debug)]
pub enum PersistError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable destination for roster snapshots.
///
/// Each write replaces the previous snapshot wholesale; there is no journal
/// to reconcile. Callers treat write failure as non-fatal: the in-memory
/// roster is never rolled back on a failed save.
pub trait RosterSink: Send {
    fn write_roster(&mut self, records: &[AttendeeRecord]) -> PersistResult<()>;
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
