use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rollcall::{
    attendee::AttendeeRecord,
    checkin::Resolution,
    core::store::RosterStore,
    persist::{PersistError, PersistResult, RosterSink},
    runtime::{
        events::RosterEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_rollcall},
    },
};

const SHEET: &str = "\
Timestamp,Please mention your name \n\
2025-09-20 10:01:22,Anita\n\
2025-09-20 10:03:41,Bala\n\
2025-09-20 10:07:05,Chandra\n";

struct RecordingSink {
    saves: Arc<Mutex<Vec<Vec<AttendeeRecord>>>>,
}

impl RosterSink for RecordingSink {
    fn write_roster(&mut self, records: &[AttendeeRecord]) -> PersistResult<()> {
        self.saves.lock().expect("lock").push(records.to_vec());
        Ok(())
    }
}

struct SlowSink {
    delay: Duration,
}

impl RosterSink for SlowSink {
    fn write_roster(&mut self, _records: &[AttendeeRecord]) -> PersistResult<()> {
        std::thread::sleep(self.delay);
        Ok(())
    }
}

struct FailingSink;

impl RosterSink for FailingSink {
    fn write_roster(&mut self, _records: &[AttendeeRecord]) -> PersistResult<()> {
        Err(PersistError::Message("disk unhappy".to_string()))
    }
}

async fn next_event(
    sub: &mut tokio::sync::broadcast::Receiver<RosterEvent>,
) -> RosterEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event timeout")
        .expect("recv")
}

#[tokio::test]
async fn import_check_in_and_export_through_the_handle() {
    let handle = spawn_rollcall(RosterStore::new(), None, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let total = handle
        .import_roster(SHEET.as_bytes().to_vec())
        .await
        .expect("import");
    assert_eq!(total, 3);

    let res = handle
        .attempt_check_in(" 2025-09-20 10:03:41 ")
        .await
        .expect("attempt");
    let Resolution::Eligible(rec) = res else {
        panic!("expected Eligible, got {res:?}");
    };
    assert_eq!(rec.name, "Bala");

    handle
        .confirm_check_in(rec.timestamp.clone())
        .await
        .expect("confirm");
    // Confirming again is an accepted no-op.
    handle
        .confirm_check_in(rec.timestamp.clone())
        .await
        .expect("second confirm");

    let res = handle
        .attempt_check_in(rec.timestamp.clone())
        .await
        .expect("attempt again");
    assert!(matches!(res, Resolution::AlreadyPresent(_)));

    let counts = handle.counts().await.expect("counts");
    assert_eq!((counts.total, counts.present, counts.absent), (3, 1, 2));

    let export = handle.export_roster().await.expect("export");
    assert_eq!(export.summary.total, 3);
    assert_eq!(export.summary.present, 1);

    assert_eq!(next_event(&mut sub).await, RosterEvent::Imported { total: 3 });
    assert_eq!(
        next_event(&mut sub).await,
        RosterEvent::CheckedIn {
            timestamp: rec.timestamp.clone()
        }
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn import_failure_leaves_the_previous_roster_canonical() {
    let handle = spawn_rollcall(RosterStore::new(), None, RuntimeConfig::default());

    handle
        .import_roster(SHEET.as_bytes().to_vec())
        .await
        .expect("import");

    let err = handle
        .import_roster(b"Timestamp,Please mention your name \n".to_vec())
        .await
        .expect_err("header-only import must fail");
    assert!(matches!(err, RuntimeError::Import(_)));

    assert_eq!(handle.counts().await.expect("counts").total, 3);
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn saves_reach_the_sink_after_import_and_confirm() {
    let saves = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink {
        saves: Arc::clone(&saves),
    };

    let handle = spawn_rollcall(
        RosterStore::new(),
        Some(Box::new(sink)),
        RuntimeConfig::default(),
    );

    handle
        .import_roster(SHEET.as_bytes().to_vec())
        .await
        .expect("import");
    handle
        .confirm_check_in("2025-09-20 10:01:22")
        .await
        .expect("confirm");
    handle.shutdown().await.expect("shutdown");

    let saves = saves.lock().expect("lock");
    let last = saves.last().expect("at least one save");
    assert_eq!(last.len(), 3);
    assert!(last.iter().any(|r| r.is_present));
}

#[tokio::test]
async fn full_save_queue_never_fails_a_check_in() {
    let sink = SlowSink {
        delay: Duration::from_millis(200),
    };
    let handle = spawn_rollcall(
        RosterStore::new(),
        Some(Box::new(sink)),
        RuntimeConfig {
            persist_queue_bound: 1,
        },
    );

    handle
        .import_roster(SHEET.as_bytes().to_vec())
        .await
        .expect("import");

    // Outpace the sink; rejected saves are swallowed, every confirm succeeds.
    for timestamp in [
        "2025-09-20 10:01:22",
        "2025-09-20 10:03:41",
        "2025-09-20 10:07:05",
    ] {
        handle.confirm_check_in(timestamp).await.expect("confirm");
    }

    assert_eq!(handle.counts().await.expect("counts").present, 3);
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn save_failure_is_swallowed_and_surfaced_as_an_event() {
    let handle = spawn_rollcall(
        RosterStore::new(),
        Some(Box::new(FailingSink)),
        RuntimeConfig::default(),
    );
    let mut sub = handle.subscribe();

    handle
        .import_roster(SHEET.as_bytes().to_vec())
        .await
        .expect("import still succeeds");
    handle
        .confirm_check_in("2025-09-20 10:01:22")
        .await
        .expect("confirm still succeeds");

    let mut save_failed = false;
    for _ in 0..6 {
        if next_event(&mut sub).await == RosterEvent::SaveFailed {
            save_failed = true;
            break;
        }
    }
    assert!(save_failed, "expected a SaveFailed event");

    // In-memory state never rolls back on save failure.
    assert_eq!(handle.counts().await.expect("counts").present, 1);
    handle.shutdown().await.expect("shutdown");
}
