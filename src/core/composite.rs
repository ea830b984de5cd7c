//! Overlap-weighted average price of a daily time window across months.

use std::collections::BTreeMap;

use bon::Builder;
use chrono::{DateTime, Local};
use enumset::EnumSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::{
        interval::{MINUTES_PER_HOUR, Segment, overlap_minutes, segments_of},
        label::TimePeriodLabel,
        tariff::TariffRecord,
    },
    error::TariffError,
    prelude::*,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Time spent and money charged in one label of the window.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: TimePeriodLabel,
    pub price: KilowattHourRate,
    pub hours: f64,
    pub cost: Cost,
}

/// Average price of the window in one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    pub month: String,
    pub start_time: String,
    pub end_time: String,
    pub avg_price: KilowattHourRate,

    /// Ordered from `tip` down to `deep`.
    pub breakdown: Vec<BreakdownEntry>,

    pub total_hours: f64,
}

impl CompositeResult {
    /// Intersect the window with the month rules.
    ///
    /// Returns `None` when the window does not overlap any rule.
    ///
    /// # Errors
    ///
    /// Malformed times of the window or of the rules, and negative prices.
    pub fn try_compute(
        record: &TariffRecord,
        start_time: &str,
        end_time: &str,
    ) -> Result<Option<Self>, TariffError> {
        let window = segments_of(start_time, end_time)?;
        Self::from_segments(record, window, start_time, end_time)
    }

    fn from_segments(
        record: &TariffRecord,
        window: impl Iterator<Item = Segment> + Clone,
        start_time: &str,
        end_time: &str,
    ) -> Result<Option<Self>, TariffError> {
        record.validate()?;

        let mut total_cost = Cost::ZERO;
        let mut total_minutes = 0;
        let mut buckets: BTreeMap<TimePeriodLabel, (KilowattHourRate, u32)> = BTreeMap::new();
        let mut unpriced = EnumSet::<TimePeriodLabel>::new();

        for rule in &record.time_rules {
            let price = record.prices.price_of(rule.label);
            for (lhs, rhs) in window.clone().cartesian_product(rule.segments()?) {
                let overlap = overlap_minutes(lhs, rhs);
                if overlap == 0 {
                    continue;
                }
                if record.prices.get(rule.label).is_none() {
                    unpriced.insert(rule.label);
                }
                total_cost += price.cost_over(minutes_to_hours(overlap));
                total_minutes += overlap;
                buckets.entry(rule.label).or_insert((price, 0)).1 += overlap;
            }
        }

        if !unpriced.is_empty() {
            warn!(id = %record.id, ?unpriced, "labels without a price are charged at zero");
        }
        if total_minutes == 0 {
            return Ok(None);
        }

        let breakdown = buckets
            .into_iter()
            .map(|(label, (price, minutes))| {
                let hours = minutes_to_hours(minutes);
                BreakdownEntry { label, price, hours, cost: price.cost_over(hours) }
            })
            .collect();
        let total_hours = minutes_to_hours(total_minutes);
        Ok(Some(Self {
            month: record.month.clone(),
            start_time: start_time.to_owned(),
            end_time: end_time.to_owned(),
            avg_price: total_cost.rate_over(total_hours),
            breakdown,
            total_hours,
        }))
    }
}

fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / f64::from(MINUTES_PER_HOUR)
}

/// Hours-weighted average of the monthly averages, `None` without any hours.
#[must_use]
pub fn aggregate(results: &[CompositeResult]) -> Option<KilowattHourRate> {
    let total_hours: f64 = results.iter().map(|result| result.total_hours).sum();
    if total_hours <= 0.0 {
        return None;
    }
    let total_cost: Cost =
        results.iter().map(|result| result.avg_price.cost_over(result.total_hours)).sum();
    Some(total_cost.rate_over(total_hours))
}

/// Why a selected month did not contribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum SkipReason {
    /// No tariff record for the province, category, voltage level and month.
    #[display("no tariff")]
    MissingTariff,

    /// The window does not intersect any rule of the month.
    #[display("no intersection")]
    NoIntersection,
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeSummary {
    pub results: Vec<CompositeResult>,
    pub skipped: Vec<(String, SkipReason)>,

    /// `None` means no data: no selected month produced a result.
    pub overall_avg_price: Option<KilowattHourRate>,
}

impl CompositeSummary {
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.results.iter().map(|result| result.total_hours).sum()
    }

    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.overall_avg_price.is_some()
    }
}

/// Composite price of a daily window over the selected months of one tariff.
#[derive(Builder)]
pub struct CompositeCalculator<'a> {
    tariffs: &'a [TariffRecord],
    province: &'a str,
    category: &'a str,
    voltage_level: &'a str,

    /// `YYYY-MM` months.
    months: &'a [String],

    /// `HH:MM`, inclusive.
    start_time: &'a str,

    /// `HH:MM`, exclusive. May be earlier than the start to wrap around midnight.
    end_time: &'a str,
}

impl CompositeCalculator<'_> {
    #[instrument(
        skip_all,
        fields(province = self.province, start_time = self.start_time, end_time = self.end_time),
    )]
    /// Average the window over the selected months, each distinct month counted once.
    ///
    /// # Errors
    ///
    /// [`TariffError::EmptySelection`] without any month, before any time is parsed.
    /// Malformed times and negative prices are fatal as well.
    pub fn calculate(&self) -> Result<CompositeSummary, TariffError> {
        if self.months.is_empty() {
            return Err(TariffError::EmptySelection);
        }
        let window = segments_of(self.start_time, self.end_time)?;

        let mut results = Vec::with_capacity(self.months.len());
        let mut skipped = Vec::new();
        for month in self.months.iter().unique() {
            let Some(record) = self.tariffs.iter().find(|record| {
                record.matches(self.province, self.category, self.voltage_level, month)
            }) else {
                debug!(%month, "no tariff, skipping");
                skipped.push((month.clone(), SkipReason::MissingTariff));
                continue;
            };
            let result = CompositeResult::from_segments(
                record,
                window.clone(),
                self.start_time,
                self.end_time,
            )?;
            match result {
                Some(result) => results.push(result),
                None => {
                    warn!(%month, "the window does not intersect any rule, skipping");
                    skipped.push((month.clone(), SkipReason::NoIntersection));
                }
            }
        }

        let overall_avg_price = aggregate(&results);
        info!(
            n_results = results.len(),
            n_skipped = skipped.len(),
            ?overall_avg_price,
            "calculated the composite price",
        );
        Ok(CompositeSummary { results, skipped, overall_avg_price })
    }
}

/// Composite price kept for later reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedCompositeResult {
    pub id: String,
    pub province: String,
    pub category: String,
    pub voltage_level: String,
    pub avg_price: KilowattHourRate,
    pub months: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Local>,
}

impl SavedCompositeResult {
    /// Package the summary, `None` when it has no data.
    #[must_use]
    pub fn from_summary(
        calculator: &CompositeCalculator<'_>,
        summary: &CompositeSummary,
    ) -> Option<Self> {
        Some(Self {
            id: Uuid::new_v4().to_string(),
            province: calculator.province.to_owned(),
            category: calculator.category.to_owned(),
            voltage_level: calculator.voltage_level.to_owned(),
            avg_price: summary.overall_avg_price?,
            months: summary.results.iter().map(|result| result.month.clone()).collect(),
            start_time: calculator.start_time.to_owned(),
            end_time: calculator.end_time.to_owned(),
            created_at: Local::now(),
        })
    }
}
