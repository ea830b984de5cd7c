use std::collections::BTreeMap;

use bon::Builder;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::{label::TimePeriodLabel, rule::TimeRule},
    error::TariffError,
    quantity::rate::KilowattHourRate,
};

/// Unit price of each time period label.
///
/// Labels without a price are charged at zero.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PriceSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<KilowattHourRate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak: Option<KilowattHourRate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<KilowattHourRate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valley: Option<KilowattHourRate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<KilowattHourRate>,
}

impl PriceSchema {
    #[must_use]
    pub const fn get(&self, label: TimePeriodLabel) -> Option<KilowattHourRate> {
        match label {
            TimePeriodLabel::Tip => self.tip,
            TimePeriodLabel::Peak => self.peak,
            TimePeriodLabel::Flat => self.flat,
            TimePeriodLabel::Valley => self.valley,
            TimePeriodLabel::Deep => self.deep,
        }
    }

    pub fn price_of(&self, label: TimePeriodLabel) -> KilowattHourRate {
        self.get(label).unwrap_or(KilowattHourRate::ZERO)
    }

    /// Find the first label with a negative price.
    #[must_use]
    pub fn negative_label(&self) -> Option<TimePeriodLabel> {
        enumset::EnumSet::<TimePeriodLabel>::all()
            .iter()
            .find(|label| self.get(*label).is_some_and(KilowattHourRate::is_negative))
    }
}

/// Price schedule of a province, category and voltage level in one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct TariffRecord {
    #[builder(default = Uuid::new_v4().to_string())]
    pub id: String,

    #[builder(into)]
    pub province: String,

    /// `YYYY-MM`.
    #[builder(into)]
    pub month: String,

    #[builder(into)]
    pub category: String,

    #[builder(into)]
    pub voltage_level: String,

    pub prices: PriceSchema,

    /// Copy of the configuration rules at the time the record was created.
    pub time_rules: Vec<TimeRule>,

    /// Any other stored fields, kept as is.
    #[builder(default)]
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TariffRecord {
    #[must_use]
    pub fn matches(
        &self,
        province: &str,
        category: &str,
        voltage_level: &str,
        month: &str,
    ) -> bool {
        self.province == province
            && self.category == category
            && self.voltage_level == voltage_level
            && self.month == month
    }

    /// # Errors
    ///
    /// [`TariffError::NegativePrice`] naming the first label with a negative price.
    pub fn validate(&self) -> Result<(), TariffError> {
        match self.prices.negative_label() {
            Some(label) => Err(TariffError::NegativePrice { id: self.id.clone(), label }),
            None => Ok(()),
        }
    }
}

/// Month of the year of a `YYYY-MM` string.
///
/// # Errors
///
/// [`TariffError::MonthFormat`] when the string is not a valid `YYYY-MM` month.
pub fn month_of_year(month: &str) -> Result<u32, TariffError> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|date| date.month())
        .map_err(|_| TariffError::MonthFormat(month.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_of_year() {
        assert_eq!(month_of_year("2024-01"), Ok(1));
        assert_eq!(month_of_year("2024-12"), Ok(12));
        assert_eq!(month_of_year("2024-13"), Err(TariffError::MonthFormat("2024-13".to_owned())));
        assert_eq!(month_of_year("January"), Err(TariffError::MonthFormat("January".to_owned())));
    }

    #[test]
    fn test_price_of_defaults_to_zero() {
        let prices = PriceSchema { peak: Some(1.0.into()), ..PriceSchema::default() };
        assert_eq!(prices.price_of(TimePeriodLabel::Peak), KilowattHourRate::from(1.0));
        assert_eq!(prices.price_of(TimePeriodLabel::Deep), KilowattHourRate::ZERO);
    }

    #[test]
    fn test_validate_negative_price() {
        let record = TariffRecord::builder()
            .id("t1".to_owned())
            .province("Shandong")
            .month("2024-01")
            .category("industrial")
            .voltage_level("1-10kV")
            .prices(PriceSchema { valley: Some((-0.1).into()), ..PriceSchema::default() })
            .time_rules(vec![])
            .build();
        assert_eq!(
            record.validate(),
            Err(TariffError::NegativePrice { id: "t1".to_owned(), label: TimePeriodLabel::Valley }),
        );
    }

    #[test]
    fn test_serde_keeps_extra_fields() -> serde_json::Result<()> {
        let json = serde_json::json!({
            "id": "t1",
            "province": "Shandong",
            "month": "2024-01",
            "category": "industrial",
            "voltage_level": "1-10kV",
            "prices": { "peak": 1.0, "valley": 0.3 },
            "time_rules": [{ "start": "00:00", "end": "00:00", "label": "valley" }],
            "source": "import",
        });
        let record: TariffRecord = serde_json::from_value(json.clone())?;
        assert_eq!(record.prices.deep, None);
        assert_eq!(record.extra["source"], "import");
        assert_eq!(serde_json::to_value(&record)?, json);
        Ok(())
    }
}
