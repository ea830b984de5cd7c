pub mod cost;
pub mod rate;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Dimensioned scalar: `ENERGY` is the power of kilowatt-hours, `COST` is the power of currency.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub OrderedFloat<f64>);

impl<const ENERGY: isize, const COST: isize> Quantity<ENERGY, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0.0 < 0.0
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{Debug, Formatter};

    use super::*;

    pub type Bare = Quantity<0, 0>;

    impl Debug for Bare {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn test_is_negative() {
        assert!(Bare::from(-0.1).is_negative());
        assert!(!Bare::ZERO.is_negative());
        assert!(!Bare::from(0.1).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Bare = [0.25, 0.5, 1.0].into_iter().map(Bare::from).sum();
        assert_eq!(total, Bare::from(1.75));

        let mut total = Bare::ZERO;
        total += Bare::from(0.5);
        assert_eq!(total + Bare::from(0.25), Bare::from(0.75));
    }

    #[test]
    fn test_from_str() -> Result<(), std::num::ParseFloatError> {
        assert_eq!("0.25".parse::<Bare>()?, Bare::from(0.25));
        assert!("cheap".parse::<Bare>().is_err());
        Ok(())
    }
}
