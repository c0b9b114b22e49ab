//! Tabular import/export boundary for the roster.

/// Reads a source sheet into attendee records.
pub mod import;

/// Writes the roster back out as a sheet with attendance marks.
pub mod export;

/// Recognized column headers, matched by exact header text.
///
/// These are the registration form's column titles verbatim, trailing
/// whitespace included. Unrecognized columns are ignored on import.
pub mod columns {
    /// Submission timestamp; the unique lookup key.
    pub const TIMESTAMP: &str = "Timestamp";
    /// Attendee name.
    pub const NAME: &str = "Please mention your name ";
    /// Primary mobile number.
    pub const MOBILE: &str =
        "Please mention your primary mobile number WITHOUT country code (e.g. 9876543210)";
    /// Primary email address.
    pub const EMAIL: &str = "Please mention your email id  (Primary) ";
    /// Attending adult count.
    pub const ADULTS: &str = "How many of you are attending the event (Adults) ? ";
    /// Attending child count.
    pub const CHILDREN: &str =
        "How many of you are attending the event (Children below 12 years) ? ";
    /// Bathukamma preparation answer.
    pub const BATHUKAMMA: &str = "Are you preparing Bathukamma for the event?";
    /// UPI transaction id.
    pub const UPI: &str = "Please share UPI traction ID if donation done. ";
    /// First-time attendance answer.
    pub const FIRST_TIME: &str =
        "Are you attending the KTCA Bathukamma event for the first time? ";
    /// Referral source answer.
    pub const SOURCE: &str =
        "How do you come across about KTCA Bangalore Bathukamma event? ";
    /// Attendance mark, written on export only.
    pub const PRESENT: &str = "Present";
}

#[derive(Debug)]
pub enum ImportError {
    /// The input could not be parsed as tabular data.
    Tabular(csv::Error),
    /// The input held a header row but no data rows.
    NoRows,
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Tabular(value)
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// Serializing a row failed.
    Tabular(csv::Error),
    /// Flushing the finished sheet failed.
    Finish(String),
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Tabular(value)
    }
}
