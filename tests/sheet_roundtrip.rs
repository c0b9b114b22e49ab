use rollcall::{
    core::store::RosterStore,
    sheet::{ImportError, columns, export, import},
};

const SHEET: &str = "\
Timestamp,Please mention your name ,Please mention your primary mobile number WITHOUT country code (e.g. 9876543210),Are you preparing Bathukamma for the event?\n\
2025-09-20 10:01:22,Anita,9876543210,Yes\n\
2025-09-20 10:03:41,Bala,9123456780,No\n\
2025-09-20 10:07:05,Chandra,9988776655,Yes\n";

#[test]
fn import_maps_rows_in_order_with_all_absent() {
    let records = import::read_roster(SHEET.as_bytes()).expect("import");

    assert_eq!(records.len(), 3);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Anita", "Bala", "Chandra"]);
    assert!(records.iter().all(|r| !r.is_present));
    assert_eq!(records[1].mobile, "9123456780");
    assert_eq!(records[1].bathukamma, "No");
    // Columns absent from the sheet map to empty strings.
    assert!(records.iter().all(|r| r.email.is_empty()));
}

#[test]
fn malformed_container_is_an_import_error() {
    // Invalid UTF-8 cannot be read as tabular text at all.
    let bytes = [0xff, 0xfe, 0x00, b'x', b',', b'y'];
    assert!(matches!(
        import::read_roster(&bytes),
        Err(ImportError::Tabular(_))
    ));
}

#[test]
fn export_then_import_round_trips_the_roster() {
    let mut store = RosterStore::from_records(import::read_roster(SHEET.as_bytes()).expect("import"));
    store.confirm_check_in("2025-09-20 10:03:41").expect("confirm");

    let out = export::write_roster(store.records()).expect("export");
    assert_eq!(out.summary.total, 3);
    assert_eq!(out.summary.present, 1);

    // The attendance column is present in the output for the consumer.
    let text = String::from_utf8(out.bytes.clone()).expect("utf8");
    assert!(text.lines().next().expect("header").contains(columns::PRESENT));
    assert_eq!(text.matches("TRUE").count(), 1);

    // Re-import restores every verbatim field in order; attendance restarts
    // at zero because an import always begins a fresh event run.
    let back = import::read_roster(&out.bytes).expect("reimport");
    assert_eq!(back.len(), 3);
    for (orig, round) in store.records().iter().zip(&back) {
        assert_eq!(round.timestamp, orig.timestamp);
        assert_eq!(round.name, orig.name);
        assert_eq!(round.mobile, orig.mobile);
        assert_eq!(round.bathukamma, orig.bathukamma);
        assert!(!round.is_present);
    }
}
