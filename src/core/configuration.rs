use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    ops::RangeInclusive,
    str::FromStr,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;

use crate::{
    core::{grid::DayGrid, rule::TimeRule},
    error::TariffError,
};

pub const MONTHS: RangeInclusive<u32> = 1..=12;

/// Months a [`TimeConfiguration`] applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MonthPattern {
    /// Every month of the year, stored as `All`.
    All,

    /// Sorted distinct months, stored as `1,2,12`.
    Months(Vec<u32>),
}

impl MonthPattern {
    /// # Errors
    ///
    /// [`TariffError::InvalidMonth`] for a month outside of 1-12.
    pub fn from_months(months: impl IntoIterator<Item = u32>) -> Result<Self, TariffError> {
        let months = months.into_iter().sorted_unstable().dedup().collect_vec();
        if let Some(month) = months.iter().copied().find(|month| !MONTHS.contains(month)) {
            return Err(TariffError::InvalidMonth(month));
        }
        Ok(Self::Months(months))
    }

    #[must_use]
    pub fn contains(&self, month: u32) -> bool {
        match self {
            Self::All => MONTHS.contains(&month),
            Self::Months(months) => months.binary_search(&month).is_ok(),
        }
    }

    #[must_use]
    pub fn months(&self) -> Vec<u32> {
        match self {
            Self::All => MONTHS.collect(),
            Self::Months(months) => months.clone(),
        }
    }
}

impl Display for MonthPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Months(months) => write!(f, "{}", months.iter().join(",")),
        }
    }
}

impl FromStr for MonthPattern {
    type Err = TariffError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let malformed = || TariffError::MonthPattern(pattern.to_owned());
        if pattern.trim() == "All" {
            return Ok(Self::All);
        }
        let months = pattern
            .split(',')
            .map(|month| month.trim().parse().map_err(|_| malformed()))
            .collect::<Result<Vec<u32>, _>>()?;
        Self::from_months(months).map_err(|_| malformed())
    }
}

/// Time rules shared by a set of months of one province.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeConfiguration {
    pub id: String,

    pub province: String,

    #[serde_as(as = "DisplayFromStr")]
    pub month_pattern: MonthPattern,

    pub time_rules: Vec<TimeRule>,
}

impl TimeConfiguration {
    /// New configuration with a freshly generated identifier.
    #[must_use]
    pub fn new(
        province: impl Into<String>,
        month_pattern: MonthPattern,
        time_rules: Vec<TimeRule>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            province: province.into(),
            month_pattern,
            time_rules,
        }
    }
}

/// First configuration of the province that applies to the month.
#[must_use]
pub fn configuration_for_month<'a>(
    configurations: &'a [TimeConfiguration],
    province: &str,
    month: u32,
) -> Option<&'a TimeConfiguration> {
    configurations.iter().find(|configuration| {
        configuration.province == province && configuration.month_pattern.contains(month)
    })
}

/// Rebuild the editable month matrix of the province.
///
/// Months without a configuration get the fallback grid.
///
/// # Errors
///
/// [`TariffError::Format`] when a stored rule is corrupt.
pub fn matrix_of(
    configurations: &[TimeConfiguration],
    province: &str,
) -> Result<BTreeMap<u32, DayGrid>, TariffError> {
    MONTHS
        .map(|month| {
            let grid = match configuration_for_month(configurations, province, month) {
                Some(configuration) => DayGrid::from_rules(&configuration.time_rules)?,
                None => DayGrid::default(),
            };
            Ok::<_, TariffError>((month, grid))
        })
        .collect()
}

/// How the month patterns of a province cover the year.
///
/// Only the grouping guarantees a partition, so imported or hand-edited configurations
/// are checked when read.
#[must_use]
#[derive(Debug, Default, Eq, PartialEq)]
pub struct MonthCoverage {
    /// Months claimed by more than one configuration.
    pub overlapping: Vec<u32>,

    /// Months no configuration applies to.
    pub missing: Vec<u32>,
}

impl MonthCoverage {
    pub fn check(configurations: &[TimeConfiguration], province: &str) -> Self {
        let mut coverage = Self::default();
        for month in MONTHS {
            let n_configurations = configurations
                .iter()
                .filter(|configuration| configuration.province == province)
                .filter(|configuration| configuration.month_pattern.contains(month))
                .count();
            match n_configurations {
                0 => coverage.missing.push(month),
                1 => {}
                _ => coverage.overlapping.push(month),
            }
        }
        coverage
    }

    #[must_use]
    pub const fn is_partition(&self) -> bool {
        self.overlapping.is_empty() && self.missing.is_empty()
    }
}
