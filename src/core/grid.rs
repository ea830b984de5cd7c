//! Dense hourly label grid and its run-length rule encoding.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::{interval::MINUTES_PER_HOUR, label::TimePeriodLabel, rule::TimeRule},
    error::TariffError,
    prelude::*,
};

pub const HOURS_PER_DAY: usize = 24;

/// Price period label for each hour of a day.
///
/// N-th element labels the time slot of N:00-N:59.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize, derive_more::From)]
pub struct DayGrid([TimePeriodLabel; HOURS_PER_DAY]);

impl Default for DayGrid {
    fn default() -> Self {
        Self::filled(TimePeriodLabel::FALLBACK)
    }
}

impl DayGrid {
    pub const fn filled(label: TimePeriodLabel) -> Self {
        Self([label; HOURS_PER_DAY])
    }

    /// # Panics
    ///
    /// When `hour` is not in `0..24`.
    #[must_use]
    pub const fn get(&self, hour: usize) -> TimePeriodLabel {
        self.0[hour]
    }

    /// Label the hours `start_hour..end_hour`.
    ///
    /// # Panics
    ///
    /// When `end_hour` is above 24 or `start_hour` is above `end_hour`.
    pub fn paint(mut self, start_hour: usize, end_hour: usize, label: TimePeriodLabel) -> Self {
        self.0[start_hour..end_hour].fill(label);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = TimePeriodLabel> + '_ {
        self.0.iter().copied()
    }

    /// Compress the grid into the minimal sequence of rules, one per run of equal labels.
    #[must_use]
    pub fn to_rules(&self) -> Vec<TimeRule> {
        self.iter()
            .enumerate()
            .chunk_by(|(_, label)| *label)
            .into_iter()
            .filter_map(|(label, run)| {
                let (first_hour, last_hour) = run.map(|(hour, _)| hour).minmax().into_option()?;
                Some(TimeRule::from_hours(first_hour, last_hour + 1, label))
            })
            .collect()
    }

    /// Expand the rules back into the grid.
    ///
    /// Hours that no rule covers keep [`TimePeriodLabel::FALLBACK`]. Boundaries inside an hour
    /// are truncated to the containing hour.
    ///
    /// # Errors
    ///
    /// [`TariffError::Format`] when a rule time is not `HH:MM`.
    pub fn from_rules<'a>(
        rules: impl IntoIterator<Item = &'a TimeRule>,
    ) -> Result<Self, TariffError> {
        let mut grid = Self::default();
        for rule in rules {
            for segment in rule.segments()? {
                if segment.start % MINUTES_PER_HOUR != 0 || segment.end % MINUTES_PER_HOUR != 0 {
                    warn!(%rule, "sub-hour boundary is truncated to whole hours");
                }
                let start_hour = (segment.start / MINUTES_PER_HOUR) as usize;
                let end_hour = (segment.end / MINUTES_PER_HOUR) as usize;
                if start_hour < end_hour {
                    grid = grid.paint(start_hour, end_hour, rule.label);
                }
            }
        }
        Ok(grid)
    }
}

impl From<DayGrid> for [TimePeriodLabel; HOURS_PER_DAY] {
    fn from(grid: DayGrid) -> Self {
        grid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        interval::MINUTES_PER_DAY,
        label::TimePeriodLabel::{Deep, Flat, Peak, Tip, Valley},
    };

    fn sample_grid() -> DayGrid {
        DayGrid::filled(Valley)
            .paint(8, 11, Peak)
            .paint(11, 13, Flat)
            .paint(18, 20, Tip)
            .paint(20, 22, Peak)
    }

    #[test]
    fn test_to_rules() {
        assert_eq!(
            sample_grid().to_rules(),
            [
                TimeRule::new("00:00", "08:00", Valley),
                TimeRule::new("08:00", "11:00", Peak),
                TimeRule::new("11:00", "13:00", Flat),
                TimeRule::new("13:00", "18:00", Valley),
                TimeRule::new("18:00", "20:00", Tip),
                TimeRule::new("20:00", "22:00", Peak),
                TimeRule::new("22:00", "00:00", Valley),
            ]
        );
    }

    #[test]
    fn test_to_rules_uniform() {
        assert_eq!(DayGrid::filled(Flat).to_rules(), [TimeRule::new("00:00", "00:00", Flat)]);
    }

    #[test]
    fn test_round_trip() -> Result<(), TariffError> {
        let grids = [
            sample_grid(),
            DayGrid::filled(Peak),
            DayGrid::filled(Deep).paint(23, 24, Tip),
            DayGrid::filled(Tip).paint(0, 1, Deep),
            DayGrid::from(std::array::from_fn(|hour| if hour % 2 == 0 { Valley } else { Peak })),
        ];
        for grid in grids {
            assert_eq!(DayGrid::from_rules(&grid.to_rules())?, grid);
        }
        Ok(())
    }

    #[test]
    fn test_minimality() {
        let grid = sample_grid();
        let rules = grid.to_rules();
        assert!(rules.iter().tuple_windows().all(|(lhs, rhs)| lhs.label != rhs.label));
        let n_runs = grid.iter().dedup().count();
        assert_eq!(rules.len(), n_runs);
    }

    fn assert_partition(rules: &[TimeRule]) -> Result<(), TariffError> {
        let mut covered = vec![0_u32; MINUTES_PER_DAY as usize];
        for rule in rules {
            for segment in rule.segments()? {
                for minute in segment.start..segment.end {
                    covered[minute as usize] += 1;
                }
            }
        }
        assert!(covered.iter().all(|n| *n == 1), "{rules:?}");
        Ok(())
    }

    #[test]
    fn test_partition() -> Result<(), TariffError> {
        assert_partition(&sample_grid().to_rules())
    }

    #[test]
    fn test_random_grids() -> Result<(), TariffError> {
        const LABELS: [TimePeriodLabel; 5] = [Tip, Peak, Flat, Valley, Deep];

        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..2_000 {
            let mut grid = DayGrid::filled(LABELS[rng.usize(..LABELS.len())]);
            for _ in 0..rng.usize(0..10) {
                let start_hour = rng.usize(0..HOURS_PER_DAY);
                let end_hour = rng.usize(start_hour..=HOURS_PER_DAY);
                grid = grid.paint(start_hour, end_hour, LABELS[rng.usize(..LABELS.len())]);
            }
            let rules = grid.to_rules();
            assert_eq!(DayGrid::from_rules(&rules)?, grid, "{rules:?}");
            assert_eq!(rules.len(), grid.iter().dedup().count());
            assert!(rules.iter().tuple_windows().all(|(lhs, rhs)| lhs.label != rhs.label));
            assert_partition(&rules)?;
        }
        Ok(())
    }

    #[test]
    fn test_from_rules_wraparound() -> Result<(), TariffError> {
        let rules = [TimeRule::new("06:00", "22:00", Peak), TimeRule::new("22:00", "06:00", Deep)];
        let grid = DayGrid::from_rules(&rules)?;
        assert_eq!(grid, DayGrid::filled(Peak).paint(0, 6, Deep).paint(22, 24, Deep));
        Ok(())
    }

    #[test]
    fn test_from_rules_gaps_fall_back() -> Result<(), TariffError> {
        let grid = DayGrid::from_rules(&[TimeRule::new("10:00", "12:00", Tip)])?;
        assert_eq!(grid, DayGrid::filled(TimePeriodLabel::FALLBACK).paint(10, 12, Tip));
        Ok(())
    }

    #[test]
    fn test_from_rules_truncates_sub_hour() -> Result<(), TariffError> {
        let rules = [TimeRule::new("08:30", "10:00", Peak), TimeRule::new("12:00", "12:30", Tip)];
        let grid = DayGrid::from_rules(&rules)?;
        assert_eq!(grid, DayGrid::filled(Valley).paint(8, 10, Peak));
        Ok(())
    }

    #[test]
    fn test_from_rules_malformed() {
        let rules = [TimeRule::new("8h", "10:00", Peak)];
        assert_eq!(DayGrid::from_rules(&rules), Err(TariffError::Format("8h".to_owned())));
    }
}
