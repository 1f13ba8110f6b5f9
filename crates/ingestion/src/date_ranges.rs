//! Splitting long date ranges into bounded request windows.
//!
//! The exchange caps how many candlesticks one request may return, so long
//! history queries are issued window by window.

use chrono::TimeDelta;
use std::iter::FusedIterator;
use std::ops::{Add, Sub};

/// Default window length in days.
pub const DEFAULT_INTERVAL_DAYS: u32 = 3;

/// Lazy sequence of half-open `(window_start, window_end)` pairs.
///
/// Windows are `interval_days` long, the last one clipped to the range end.
/// Cloning yields an independent iterator that replays from its current
/// position, so a fresh clone (or a fresh call) restarts the sequence.
#[derive(Debug, Clone)]
pub struct DateRanges<T> {
    current: T,
    end: T,
    /// `None` for a zero interval, which yields nothing.
    step: Option<TimeDelta>,
}

impl<T> DateRanges<T>
where
    T: Clone + PartialOrd + Add<TimeDelta, Output = T> + Sub<T, Output = TimeDelta>,
{
    /// Windows over `[start, end)` of `interval_days` each.
    pub fn new(start: T, end: T, interval_days: u32) -> Self {
        let step = (interval_days > 0).then(|| TimeDelta::days(i64::from(interval_days)));
        Self {
            current: start,
            end,
            step,
        }
    }

    /// Windows of [`DEFAULT_INTERVAL_DAYS`].
    pub fn with_default_interval(start: T, end: T) -> Self {
        Self::new(start, end, DEFAULT_INTERVAL_DAYS)
    }

    fn remaining(&self) -> usize {
        let Some(step) = self.step else {
            return 0;
        };
        if self.current >= self.end {
            return 0;
        }
        let span_ms = (self.end.clone() - self.current.clone()).num_milliseconds();
        let step_ms = step.num_milliseconds();
        usize::try_from((span_ms + step_ms - 1) / step_ms).unwrap_or(usize::MAX)
    }
}

impl<T> Iterator for DateRanges<T>
where
    T: Clone + PartialOrd + Add<TimeDelta, Output = T> + Sub<T, Output = TimeDelta>,
{
    type Item = (T, T);

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.step?;
        if self.current >= self.end {
            return None;
        }

        // Clip before adding so a window near the calendar's end cannot overflow.
        let window_end = if self.end.clone() - self.current.clone() <= step {
            self.end.clone()
        } else {
            self.current.clone() + step
        };
        let window_start = std::mem::replace(&mut self.current, window_end.clone());
        Some((window_start, window_end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for DateRanges<T> where
    T: Clone + PartialOrd + Add<TimeDelta, Output = T> + Sub<T, Output = TimeDelta>
{
}

impl<T> FusedIterator for DateRanges<T> where
    T: Clone + PartialOrd + Add<TimeDelta, Output = T> + Sub<T, Output = TimeDelta>
{
}

/// Split `[start, end)` into windows of `interval_days`.
///
/// An empty or inverted range, or a zero interval, yields no windows.
pub fn generate_date_ranges<T>(start: T, end: T, interval_days: u32) -> DateRanges<T>
where
    T: Clone + PartialOrd + Add<TimeDelta, Output = T> + Sub<T, Output = TimeDelta>,
{
    DateRanges::new(start, end, interval_days)
}
