//! Busy interval arithmetic.

use chrono::NaiveDateTime;

/// A half-open busy interval `[start, end)` in civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Intersect with `[window_start, window_end)`. Returns `None` when the
    /// intersection is empty.
    pub fn clip(&self, window_start: NaiveDateTime, window_end: NaiveDateTime) -> Option<Self> {
        let start = self.start.max(window_start);
        let end = self.end.min(window_end);
        (start < end).then_some(Self { start, end })
    }
}

/// Sort by start and merge overlapping or touching intervals.
pub fn merge_intervals(mut intervals: Vec<BusyInterval>) -> Vec<BusyInterval> {
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}
