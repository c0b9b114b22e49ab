//! Runtime event stream payloads.

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    /// A new roster replaced the canonical one.
    Imported {
        /// Records in the new roster.
        total: usize,
    },
    /// An attendee was marked present.
    CheckedIn {
        /// Lookup key of the marked record.
        timestamp: String,
    },
    /// The latest roster snapshot reached durable storage.
    Saved,
    /// A roster save failed; in-memory state is unaffected.
    SaveFailed,
}
