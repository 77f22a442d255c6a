//! Error types for Epocha

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Which formatted field an input was meant for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM:SS`
    Time,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Date => f.write_str("date"),
            FieldKind::Time => f.write_str("time"),
        }
    }
}

/// Core Epocha errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpochError {
    // Write errors
    #[error("Invalid numeric input {input:?}: {reason}")]
    InvalidNumericInput { input: String, reason: &'static str },

    #[error("Invalid {field} field {input:?}: {reason}")]
    ParseError {
        field: FieldKind,
        input: String,
        reason: &'static str,
    },

    #[error("Date out of range: {date}")]
    DateOutOfRange { date: NaiveDate },

    #[error("Date {date} does not exist in this time zone")]
    NonexistentDate { date: NaiveDate },

    // Read errors
    #[error("Formatting failed for pattern {pattern:?}")]
    FormattingFailure { pattern: String },

    // Config errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EpochError {
    pub(crate) fn numeric(input: impl Into<String>, reason: &'static str) -> Self {
        EpochError::InvalidNumericInput {
            input: input.into(),
            reason,
        }
    }

    pub(crate) fn parse(field: FieldKind, input: impl Into<String>, reason: &'static str) -> Self {
        EpochError::ParseError {
            field,
            input: input.into(),
            reason,
        }
    }

    /// True for errors caused by the user's input rather than by configuration
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            EpochError::InvalidNumericInput { .. }
                | EpochError::ParseError { .. }
                | EpochError::DateOutOfRange { .. }
                | EpochError::NonexistentDate { .. }
        )
    }
}

/// Result type for Epocha operations
pub type EpochResult<T> = Result<T, EpochError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EpochError::parse(FieldKind::Time, "99:00:00", "hour out of range");
        assert_eq!(
            err.to_string(),
            "Invalid time field \"99:00:00\": hour out of range"
        );

        let err = EpochError::numeric("abc", "not a number");
        assert_eq!(err.to_string(), "Invalid numeric input \"abc\": not a number");
    }

    #[test]
    fn test_input_rejection_classification() {
        assert!(EpochError::numeric("", "empty").is_input_rejection());
        assert!(EpochError::parse(FieldKind::Date, "x", "bad").is_input_rejection());
        let skipped = NaiveDate::from_ymd_opt(2011, 12, 30).unwrap();
        assert!(EpochError::NonexistentDate { date: skipped }.is_input_rejection());
        assert!(!EpochError::InvalidConfig("bad".into()).is_input_rejection());
        assert!(!EpochError::FormattingFailure {
            pattern: "%Q".into()
        }
        .is_input_rejection());
    }
}
