//! Check-in resolution and the two-phase confirm state machine.

use crate::{
    attendee::AttendeeRecord,
    core::store::{RosterStore, StoreError},
};

/// Outcome of resolving a lookup key against the roster.
///
/// `NotFound` and `AlreadyPresent` are expected classifications, not errors;
/// a scanned key foreign to this roster and a repeated scan are both normal
/// operator flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No record has this key.
    NotFound,
    /// The record exists and is already marked present; no mutation follows.
    AlreadyPresent(AttendeeRecord),
    /// The record exists and may be confirmed present.
    Eligible(AttendeeRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `confirm` was called without a pending `Eligible` classification.
    NoPendingCheckIn,
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// State of a single check-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No attempt in flight.
    #[default]
    Idle,
    /// A key has been classified; awaiting confirm or cancel.
    Classified(Resolution),
}

/// Two-phase check-in: classify first, mutate only on an explicit confirm.
///
/// The split lets an operator inspect who will be marked before the change
/// takes effect. `classify` is a pure query; repeated calls with no
/// intervening confirm return the same classification.
#[derive(Debug, Default)]
pub struct CheckInSession {
    state: SessionState,
}

impl CheckInSession {
    /// Starts in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Resolves `key` against the roster and records the classification.
    ///
    /// Keys arrive here from either a scanned code or manual entry; both are
    /// trimmed and treated identically.
    pub fn classify(&mut self, store: &RosterStore, key: &str) -> Resolution {
        let resolution = store.resolve(key.trim());
        self.state = SessionState::Classified(resolution.clone());
        resolution
    }

    /// Confirms the pending `Eligible` classification, marking the record
    /// present and returning to `Idle`.
    ///
    /// Any other state is `NoPendingCheckIn` and leaves the session
    /// untouched; `NotFound` and `AlreadyPresent` classifications can only be
    /// dismissed via [`CheckInSession::cancel`].
    pub fn confirm(&mut self, store: &mut RosterStore) -> Result<AttendeeRecord, SessionError> {
        let SessionState::Classified(Resolution::Eligible(rec)) = &self.state else {
            return Err(SessionError::NoPendingCheckIn);
        };
        let timestamp = rec.timestamp.clone();
        store.confirm_check_in(&timestamp)?;
        self.state = SessionState::Idle;
        store
            .get(&timestamp)
            .cloned()
            .ok_or_else(|| SessionError::Store(StoreError::UnknownTimestamp(timestamp)))
    }

    /// Discards any pending classification and returns to `Idle`.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }
}
