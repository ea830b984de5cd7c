use std::fmt::{Debug, Display, Formatter};

use crate::quantity::{Quantity, cost::Cost};

/// Currency per kilowatt-hour.
pub type KilowattHourRate = Quantity<-1, 1>;

impl KilowattHourRate {
    /// Cost of drawing one kilowatt for the given number of hours.
    pub fn cost_over(self, hours: f64) -> Cost {
        Cost::from(self.0 * hours)
    }
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} ¥/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}¥/kWh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_cost_over() {
        assert_abs_diff_eq!(KilowattHourRate::from(0.65).cost_over(4.0).0.0, 2.6);
    }

    #[test]
    fn test_display() {
        assert_eq!(KilowattHourRate::from(0.3).to_string(), "0.3000 ¥/kWh");
    }
}
