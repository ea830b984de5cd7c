use std::fmt::{Debug, Display, Formatter};

use crate::quantity::{Quantity, rate::KilowattHourRate};

pub type Cost = Quantity<0, 1>;

impl Cost {
    /// Rate that charges this cost for drawing one kilowatt over the given hours.
    pub fn rate_over(self, hours: f64) -> KilowattHourRate {
        KilowattHourRate::from(self.0 / hours)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} ¥", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}¥", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_rate_over() {
        assert_abs_diff_eq!(Cost::from(2.6).rate_over(4.0).0.0, 0.65);
    }

    #[test]
    fn test_rate_over_inverts_cost_over() {
        let rate = KilowattHourRate::from(0.3);
        assert_eq!(rate.cost_over(2.0).rate_over(2.0), rate);
    }
}
