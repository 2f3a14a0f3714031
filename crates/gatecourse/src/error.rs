//! Error types for the gatecourse crate.

use std::fmt;

/// Result type for gatecourse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating course or vehicle configuration.
///
/// The per-tick simulation never produces errors; these only surface when
/// configuration is assembled at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A vehicle tuning parameter is outside its valid range.
    InvalidTuning {
        /// The offending field.
        field: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// A zone was configured with an unusable radius.
    InvalidZone {
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTuning { field, detail } => {
                write!(f, "invalid vehicle tuning `{field}`: {detail}")
            }
            Error::InvalidZone { detail } => write!(f, "invalid zone: {detail}"),
        }
    }
}

impl std::error::Error for Error {}
