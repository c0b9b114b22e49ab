use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    attendee::{AttendeeRecord, RosterCounts},
    checkin::Resolution,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    UnknownTimestamp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshotV1 {
    pub records: Vec<AttendeeRecord>,
}

#[derive(Debug, Default)]
pub struct RosterStore {
    records: Vec<AttendeeRecord>,
    // First-match index: on duplicate timestamps the earliest row wins and
    // later duplicates are unreachable by lookup.
    by_timestamp: HashMap<String, usize>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AttendeeRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    pub fn from_snapshot(snapshot: RosterSnapshotV1) -> Self {
        Self::from_records(snapshot.records)
    }

    pub fn export_snapshot(&self) -> RosterSnapshotV1 {
        RosterSnapshotV1 {
            records: self.records.clone(),
        }
    }

    /// Replaces the whole roster, discarding any prior check-in progress.
    pub fn replace_all(&mut self, records: Vec<AttendeeRecord>) {
        self.records = records;
        self.by_timestamp = HashMap::with_capacity(self.records.len());
        for (idx, rec) in self.records.iter().enumerate() {
            self.by_timestamp.entry(rec.timestamp.clone()).or_insert(idx);
        }
    }

    /// Classifies `key` against the roster without mutating anything.
    pub fn resolve(&self, key: &str) -> Resolution {
        let Some(rec) = self.by_timestamp.get(key).map(|idx| &self.records[*idx]) else {
            return Resolution::NotFound;
        };
        if rec.is_present {
            Resolution::AlreadyPresent(rec.clone())
        } else {
            Resolution::Eligible(rec.clone())
        }
    }

    /// Marks the record for `timestamp` present.
    ///
    /// Returns `Ok(true)` when the mark was newly applied and `Ok(false)`
    /// when the record was already present; confirming twice yields the same
    /// roster as confirming once.
    pub fn confirm_check_in(&mut self, timestamp: &str) -> Result<bool, StoreError> {
        let idx = *self
            .by_timestamp
            .get(timestamp)
            .ok_or_else(|| StoreError::UnknownTimestamp(timestamp.to_string()))?;
        let rec = &mut self.records[idx];
        if rec.is_present {
            return Ok(false);
        }
        rec.is_present = true;
        Ok(true)
    }

    pub fn get(&self, timestamp: &str) -> Option<&AttendeeRecord> {
        self.by_timestamp
            .get(timestamp)
            .map(|idx| &self.records[*idx])
    }

    pub fn records(&self) -> &[AttendeeRecord] {
        &self.records
    }

    pub fn records_cloned(&self) -> Vec<AttendeeRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counts(&self) -> RosterCounts {
        let total = self.records.len();
        let present = self.records.iter().filter(|r| r.is_present).count();
        RosterCounts {
            total,
            present,
            absent: total - present,
        }
    }
}
