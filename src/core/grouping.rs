use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    core::{
        configuration::{MONTHS, MonthPattern, TimeConfiguration},
        grid::DayGrid,
    },
    error::TariffError,
    prelude::*,
};

/// Group the months with identical rule sequences into configurations.
///
/// A single rule sequence covering the whole year becomes one `All` configuration.
/// The configurations are ordered by their first month.
///
/// # Errors
///
/// [`TariffError::InvalidMonth`] for a key outside of 1-12.
#[instrument(skip_all, fields(province = province, n_months = grids.len()))]
pub fn group_months(
    province: &str,
    grids: &BTreeMap<u32, DayGrid>,
) -> Result<Vec<TimeConfiguration>, TariffError> {
    if let Some(month) = grids.keys().copied().find(|month| !MONTHS.contains(month)) {
        return Err(TariffError::InvalidMonth(month));
    }

    let groups = grids
        .iter()
        .map(|(month, grid)| (grid.to_rules(), *month))
        .into_group_map()
        .into_iter()
        .filter(|(time_rules, _)| !time_rules.is_empty())
        .sorted_unstable_by_key(|(_, months)| months.first().copied())
        .collect_vec();
    info!(n_groups = groups.len(), "grouped the months by rules…");

    if let [(time_rules, months)] = groups.as_slice()
        && months.len() == MONTHS.count()
    {
        return Ok(vec![TimeConfiguration::new(province, MonthPattern::All, time_rules.clone())]);
    }

    groups
        .into_iter()
        .map(|(time_rules, months)| {
            let month_pattern = MonthPattern::from_months(months)?;
            Ok::<_, TariffError>(TimeConfiguration::new(province, month_pattern, time_rules))
        })
        .collect()
}

/// Full replacement of the province configurations after the matrix is saved.
#[must_use]
#[derive(Debug)]
pub struct ConfigurationReplacement {
    /// New configurations to store.
    pub upserts: Vec<TimeConfiguration>,

    /// Identifiers of all prior configurations of the province.
    pub deletions: Vec<String>,
}

impl ConfigurationReplacement {
    /// # Errors
    ///
    /// See [`group_months`].
    #[instrument(skip_all, fields(province = province))]
    pub fn new(
        province: &str,
        existing: &[TimeConfiguration],
        grids: &BTreeMap<u32, DayGrid>,
    ) -> Result<Self, TariffError> {
        let upserts = group_months(province, grids)?;
        let deletions = existing
            .iter()
            .filter(|configuration| configuration.province == province)
            .map(|configuration| configuration.id.clone())
            .collect_vec();
        info!(n_upserts = upserts.len(), n_deletions = deletions.len(), "planned the replacement");
        Ok(Self { upserts, deletions })
    }
}
