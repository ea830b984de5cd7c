use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        interval::{Segment, rule_segments_of},
        label::TimePeriodLabel,
    },
    error::TariffError,
};

/// Labeled `[start, end)` part of a day.
///
/// Times are kept as `HH:MM` strings the way they are stored and only parsed on use,
/// so corrupt records surface as [`TariffError::Format`] at computation time.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeRule {
    pub start: String,
    pub end: String,
    pub label: TimePeriodLabel,
}

impl TimeRule {
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>, label: TimePeriodLabel) -> Self {
        Self { start: start.into(), end: end.into(), label }
    }

    /// Rule spanning whole hours `start_hour..end_hour`, the end of the day written as `00:00`.
    #[must_use]
    pub fn from_hours(start_hour: usize, end_hour: usize, label: TimePeriodLabel) -> Self {
        Self::new(format!("{start_hour:02}:00"), format!("{:02}:00", end_hour % 24), label)
    }

    /// # Errors
    ///
    /// [`TariffError::Format`] when the rule is corrupt.
    pub fn segments(&self) -> Result<impl Iterator<Item = Segment> + Clone, TariffError> {
        rule_segments_of(&self.start, &self.end)
    }
}

impl Display for TimeRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} {}", self.start, self.end, self.label)
    }
}
