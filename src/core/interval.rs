//! Half-open minute intervals within a single day.

use std::iter::once;

use crate::{error::TariffError, ops::RangeExclusive};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// `[start, end)` in minutes since midnight, within `0..=1440`.
pub type Segment = RangeExclusive<u32>;

/// Parse `HH:MM` into minutes since midnight.
///
/// # Errors
///
/// [`TariffError::Format`] unless the hour is in 0-23 and the minute is in 0-59.
pub fn time_to_minutes(time: &str) -> Result<u32, TariffError> {
    let malformed = || TariffError::Format(time.to_owned());
    let (hour, minute) = time.split_once(':').ok_or_else(malformed)?;
    let hour = parse_component(hour, 23).ok_or_else(malformed)?;
    let minute = parse_component(minute, 59).ok_or_else(malformed)?;
    Ok(hour * MINUTES_PER_HOUR + minute)
}

fn parse_component(component: &str, max: u32) -> Option<u32> {
    if component.is_empty() || component.len() > 2 || !component.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    component.parse().ok().filter(|value| *value <= max)
}

/// Like [`time_to_minutes`], but also accepts `24:00` as the end of the day.
fn end_to_minutes(time: &str) -> Result<u32, TariffError> {
    if time == "24:00" { Ok(MINUTES_PER_DAY) } else { time_to_minutes(time) }
}

/// Split `start..end` into segments, wrapping around midnight when `end < start`.
///
/// `00:00` as the end after a non-zero start means the end of the day.
/// `00:00..00:00` yields a single empty segment.
///
/// # Errors
///
/// [`TariffError::Format`] on a malformed start or end.
pub fn segments_of(
    start: &str,
    end: &str,
) -> Result<impl Iterator<Item = Segment> + Clone, TariffError> {
    let start = time_to_minutes(start)?;
    let end = match end_to_minutes(end)? {
        0 if start != 0 => MINUTES_PER_DAY,
        end => end,
    };
    Ok(split(start, end))
}

/// Segments of a day rule: unlike a free window, `00:00` as the end always closes the day,
/// so that a rule spanning the whole day reads `00:00..00:00`.
///
/// # Errors
///
/// [`TariffError::Format`] on a malformed start or end.
pub fn rule_segments_of(
    start: &str,
    end: &str,
) -> Result<impl Iterator<Item = Segment> + Clone, TariffError> {
    let start = time_to_minutes(start)?;
    let end = match end_to_minutes(end)? {
        0 => MINUTES_PER_DAY,
        end => end,
    };
    Ok(split(start, end))
}

fn split(start: u32, end: u32) -> impl Iterator<Item = Segment> + Clone {
    let (first, second) = if end < start {
        (Segment::new(start, MINUTES_PER_DAY), Some(Segment::new(0, end)))
    } else {
        (Segment::new(start, end), None)
    };
    once(Some(first)).chain(once(second)).flatten()
}

/// Length of the common part of two segments.
#[must_use]
pub fn overlap_minutes(lhs: Segment, rhs: Segment) -> u32 {
    lhs.intersect(rhs).map_or(0, Segment::len)
}
