use thiserror::Error;

use crate::core::label::TimePeriodLabel;

/// Errors raised by the tariff core.
///
/// Skipped months are not errors; see [`crate::core::composite::SkipReason`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TariffError {
    /// Time of day is not `HH:MM` with the hour in 0-23 and the minute in 0-59.
    #[error("malformed time `{0}`, expected `HH:MM`")]
    Format(String),

    #[error("no months selected")]
    EmptySelection,

    #[error("month {0} is outside of 1-12")]
    InvalidMonth(u32),

    #[error("malformed month `{0}`, expected `YYYY-MM`")]
    MonthFormat(String),

    #[error("malformed month pattern `{0}`")]
    MonthPattern(String),

    #[error("tariff `{id}` has a negative `{label}` price")]
    NegativePrice { id: String, label: TimePeriodLabel },
}
