//! Roster importer: raw sheet bytes in, ordered attendee records out.

use csv::{ReaderBuilder, StringRecord};

use crate::attendee::AttendeeRecord;

use super::{ImportError, columns};

/// Column positions resolved against one header row.
///
/// A recognized header missing from the sheet leaves its position `None`;
/// the mapped field is then the empty string for every row, never an error.
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    timestamp: Option<usize>,
    name: Option<usize>,
    mobile: Option<usize>,
    email: Option<usize>,
    adults: Option<usize>,
    children: Option<usize>,
    bathukamma: Option<usize>,
    upi: Option<usize>,
    first_time: Option<usize>,
    source: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |title: &str| headers.iter().position(|h| h == title);
        Self {
            timestamp: position(columns::TIMESTAMP),
            name: position(columns::NAME),
            mobile: position(columns::MOBILE),
            email: position(columns::EMAIL),
            adults: position(columns::ADULTS),
            children: position(columns::CHILDREN),
            bathukamma: position(columns::BATHUKAMMA),
            upi: position(columns::UPI),
            first_time: position(columns::FIRST_TIME),
            source: position(columns::SOURCE),
        }
    }

    fn record_from_row(&self, row: &StringRecord) -> AttendeeRecord {
        let field = |pos: Option<usize>| {
            pos.and_then(|idx| row.get(idx)).unwrap_or("").to_string()
        };
        AttendeeRecord {
            timestamp: field(self.timestamp),
            name: field(self.name),
            mobile: field(self.mobile),
            email: field(self.email),
            adults: field(self.adults),
            children: field(self.children),
            bathukamma: field(self.bathukamma),
            upi: field(self.upi),
            first_time: field(self.first_time),
            source: field(self.source),
            // Attendance never carries over from the source sheet; a fresh
            // import means a fresh event run.
            is_present: false,
        }
    }
}

/// Parses raw sheet bytes (header row plus data rows) into roster records,
/// preserving row order.
pub fn read_roster(bytes: &[u8]) -> Result<Vec<AttendeeRecord>, ImportError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let map = ColumnMap::from_headers(reader.headers()?);

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(map.record_from_row(&row?));
    }
    if records.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(records)
}
