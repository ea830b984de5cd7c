use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde::{Deserialize, Serialize};

/// Pricing tier of a time period.
///
/// Tiers rank `tip > peak > flat > valley > deep` by price. [`Ord`] follows the display order,
/// so sorting puts the most expensive tier first.
#[derive(Debug, Hash, Ord, PartialOrd, Serialize, Deserialize, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriodLabel {
    /// Critical peak.
    Tip,

    Peak,

    Flat,

    Valley,

    /// Deep valley.
    Deep,
}

impl TimePeriodLabel {
    /// Label of the hours that no rule covers.
    pub const FALLBACK: Self = Self::Valley;

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Tip => Color::Magenta,
            Self::Peak => Color::Red,
            Self::Flat => Color::DarkYellow,
            Self::Valley => Color::Green,
            Self::Deep => Color::Blue,
        }
    }

    /// One-letter code for dense matrix views.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Tip => 'T',
            Self::Peak => 'P',
            Self::Flat => 'F',
            Self::Valley => 'V',
            Self::Deep => 'D',
        }
    }
}

impl Display for TimePeriodLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tip => write!(f, "tip"),
            Self::Peak => write!(f, "peak"),
            Self::Flat => write!(f, "flat"),
            Self::Valley => write!(f, "valley"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_display_order() {
        let labels = EnumSet::<TimePeriodLabel>::all().iter().sorted().collect_vec();
        assert_eq!(
            labels,
            [
                TimePeriodLabel::Tip,
                TimePeriodLabel::Peak,
                TimePeriodLabel::Flat,
                TimePeriodLabel::Valley,
                TimePeriodLabel::Deep,
            ]
        );
    }

    #[test]
    fn test_serde_lowercase() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&TimePeriodLabel::Valley)?, r#""valley""#);
        assert_eq!(serde_json::from_str::<TimePeriodLabel>(r#""tip""#)?, TimePeriodLabel::Tip);
        Ok(())
    }
}
