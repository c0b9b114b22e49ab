//! Attendee roster records and derived counts.

use serde::{Deserialize, Serialize};

/// One roster row, keyed by the submission timestamp of the source form.
///
/// Every field except `is_present` is copied verbatim from the source sheet
/// and never validated or transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRecord {
    /// Unique lookup key used for check-in resolution.
    pub timestamp: String,
    /// Attendee name.
    pub name: String,
    /// Primary mobile number.
    pub mobile: String,
    /// Primary email address.
    pub email: String,
    /// Number of attending adults.
    pub adults: String,
    /// Number of attending children.
    pub children: String,
    /// Whether the attendee is bringing a Bathukamma.
    pub bathukamma: String,
    /// UPI transaction id for any donation.
    pub upi: String,
    /// Whether this is the attendee's first event.
    pub first_time: String,
    /// How the attendee heard about the event.
    pub source: String,
    /// True once the attendee has been checked in.
    pub is_present: bool,
}

/// Attendance totals derived from the canonical roster.
///
/// Always recomputed from the records, so `present + absent == total` holds
/// after any sequence of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterCounts {
    /// Number of roster records.
    pub total: usize,
    /// Records marked present.
    pub present: usize,
    /// Records not yet marked present.
    pub absent: usize,
}
