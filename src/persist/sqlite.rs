//! SQLite-backed roster snapshot store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{
    attendee::AttendeeRecord,
    core::store::{RosterSnapshotV1, RosterStore},
};

use super::{PersistResult, RosterSink};

const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Fixed logical key for the current roster snapshot.
const ROSTER_KEY: &str = "attendees";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEnvelope {
    format_version: u16,
    snapshot: RosterSnapshotV1,
}

/// SQLite implementation of [`crate::persist::RosterSink`].
///
/// The store holds exactly one serialized roster under a fixed key; every
/// save overwrites the previous value.
pub struct SqliteRosterStore {
    conn: Connection,
}

impl SqliteRosterStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Returns the last saved roster, or an empty roster if none exists.
    ///
    /// A corrupt or unsupported payload is treated as "no data": logged and
    /// mapped to an empty roster rather than surfaced, so a damaged store
    /// never blocks starting a session.
    pub fn load_roster(&self) -> PersistResult<Vec<AttendeeRecord>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM roster WHERE key = ?1",
                params![ROSTER_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<SnapshotEnvelope>(&payload) {
            Ok(env) if env.format_version == SNAPSHOT_FORMAT_VERSION => Ok(env.snapshot.records),
            Ok(env) => {
                log::warn!(
                    "unsupported roster snapshot format {}; starting with an empty roster",
                    env.format_version
                );
                Ok(Vec::new())
            }
            Err(err) => {
                log::warn!("corrupt roster snapshot; starting with an empty roster: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Loads the persisted roster into a ready store.
    pub fn load_store(&self) -> PersistResult<RosterStore> {
        Ok(RosterStore::from_records(self.load_roster()?))
    }
}

impl RosterSink for SqliteRosterStore {
    fn write_roster(&mut self, records: &[AttendeeRecord]) -> PersistResult<()> {
        let env = SnapshotEnvelope {
            format_version: SNAPSHOT_FORMAT_VERSION,
            snapshot: RosterSnapshotV1 {
                records: records.to_vec(),
            },
        };
        let payload = serde_json::to_vec(&env)?;
        self.conn.execute(
            "INSERT INTO roster(key, ts_ms, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET ts_ms = excluded.ts_ms, payload = excluded.payload",
            params![ROSTER_KEY, now_ms() as i64, payload],
        )?;
        Ok(())
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
