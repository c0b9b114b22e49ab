//! Canonical in-memory roster owned by the state manager.

/// Authoritative roster store and derived counts.
pub mod store;
