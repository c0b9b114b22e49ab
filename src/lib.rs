//! Event attendance tracking: authoritative in-memory roster with
//! idempotent check-in, sheet import/export, and best-effort SQLite saves.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::RosterStore`]:
//! ```
//! use rollcall::{checkin::Resolution, core::store::RosterStore, sheet::import};
//!
//! let sheet = "Timestamp,Please mention your name \n\
//!              2025-09-20 10:01:22,Anita\n\
//!              2025-09-20 10:03:41,Bala\n";
//! let mut store = RosterStore::from_records(import::read_roster(sheet.as_bytes()).expect("import"));
//!
//! assert!(matches!(store.resolve("2025-09-20 10:01:22"), Resolution::Eligible(_)));
//! store.confirm_check_in("2025-09-20 10:01:22").expect("confirm");
//! assert!(matches!(store.resolve("2025-09-20 10:01:22"), Resolution::AlreadyPresent(_)));
//! assert_eq!(store.counts().present, 1);
//! ```
//!
//! Runtime usage with the SQLite store:
//! ```no_run
//! use rollcall::{
//!     persist::sqlite::SqliteRosterStore,
//!     runtime::handle::{RuntimeConfig, spawn_rollcall},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sink = SqliteRosterStore::open("rollcall.db").expect("open sqlite");
//! let store = sink.load_store().expect("load");
//! let handle = spawn_rollcall(store, Some(Box::new(sink)), RuntimeConfig::default());
//! let total = handle
//!     .import_roster(std::fs::read("roster.csv").expect("read sheet"))
//!     .await
//!     .expect("import");
//! assert_eq!(handle.counts().await.expect("counts").total, total);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Roster record and derived count types.
pub mod attendee;
/// Check-in resolver and two-phase confirm session.
pub mod checkin;
/// Canonical in-memory roster store.
pub mod core;
/// Persistence abstraction and SQLite implementation.
pub mod persist;
/// Runtime handle and events for the single-writer loop.
pub mod runtime;
/// Tabular import/export boundary.
pub mod sheet;
