//! Errors raised at the profile boundary.
//!
//! The engine itself never fails: absent due dates, durations and categories
//! are handled by dedicated branches. Only the string settings a caller hands
//! us (work hours, timezone, energy label) can be malformed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeOfDayError {
    #[error("expected HH:MM, got '{0}'")]
    Format(String),

    #[error("time of day out of range: '{0}'")]
    OutOfRange(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("invalid {field}: {source}")]
    TimeOfDay {
        field: &'static str,
        #[source]
        source: TimeOfDayError,
    },

    #[error("invalid timezone: {0}")]
    Timezone(String),

    #[error("unknown peak energy time '{0}' (expected morning, afternoon or evening)")]
    PeakEnergy(String),

    #[error("work hours start ({start}) must be before end ({end})")]
    EmptyWorkWindow { start: String, end: String },
}

pub type Result<T, E = ProfileError> = std::result::Result<T, E>;
