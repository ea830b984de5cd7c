use std::{
    fmt::{Debug, Formatter},
    ops::Sub,
};

#[must_use]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct RangeExclusive<T: Copy> {
    pub start: T,
    pub end: T,
}

impl<T: Copy + Debug> Debug for RangeExclusive<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl<T: Copy> RangeExclusive<T> {
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

impl<T: Copy + Sub> RangeExclusive<T> {
    #[must_use]
    pub fn len(self) -> <T as Sub>::Output {
        self.end - self.start
    }
}

impl<T: Copy + Ord> RangeExclusive<T> {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Common part of both ranges, `None` when they do not overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let intersection = Self::new(self.start.max(other.start), self.end.min(other.end));
        if intersection.is_empty() { None } else { Some(intersection) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        let a = RangeExclusive::new(0, 10);
        assert_eq!(a.intersect(RangeExclusive::new(5, 15)), Some(RangeExclusive::new(5, 10)));
        assert_eq!(a.intersect(RangeExclusive::new(10, 15)), None);
        assert_eq!(a.intersect(RangeExclusive::new(3, 3)), None);
    }
}
