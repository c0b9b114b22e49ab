//! Async roster loop: one writer, best-effort saves, broadcast events.

/// Event payloads broadcast by the roster loop.
pub mod events;
/// Roster handle, command loop, and save worker.
pub mod handle;
