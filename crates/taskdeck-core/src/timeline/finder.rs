//! Free slot detection across a date range.
//!
//! For every working day in the range the finder clips the day's working
//! window to the query range, subtracts merged busy time and emits whatever
//! positive-length gaps remain.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use super::interval::{merge_intervals, BusyInterval};
use crate::error::{Result, ValidationError};
use crate::schedule::{CalendarEvent, FreeSlot, WorkingHours};

/// Finder for free working time between calendar commitments.
pub struct FreeSlotFinder {
    policy: WorkingHours,
}

impl FreeSlotFinder {
    /// Create a finder for the given policy, validating it first.
    pub fn new(policy: WorkingHours) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &WorkingHours {
        &self.policy
    }

    /// Find free slots in `[range_start, range_end)`.
    ///
    /// # Arguments
    /// * `busy` - Busy events in any order, possibly overlapping
    /// * `range_start` - Earliest instant a slot may start (normally "now")
    /// * `range_end` - Latest instant a slot may end
    ///
    /// # Returns
    /// Slots ordered by date, then by start time
    pub fn find(
        &self,
        busy: &[CalendarEvent],
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Result<Vec<FreeSlot>> {
        if range_end < range_start {
            return Err(ValidationError::InvalidTimeRange {
                start: range_start,
                end: range_end,
            }
            .into());
        }

        let mut slots = Vec::new();
        let mut day = range_start.date();
        let last_day = range_end.date();

        while day <= last_day {
            if self.policy.skip_weekends && is_weekend(day) {
                tracing::trace!(%day, "skipping weekend");
            } else {
                let before = slots.len();
                self.collect_day(busy, day, range_start, range_end, &mut slots);
                tracing::debug!(%day, slots = slots.len() - before, "free slots for day");
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(slots)
    }

    fn collect_day(
        &self,
        busy: &[CalendarEvent],
        day: NaiveDate,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
        out: &mut Vec<FreeSlot>,
    ) {
        let mut window_start = day.and_time(self.policy.start_time());
        let mut window_end = day.and_time(self.policy.end_time());
        if day == range_start.date() {
            window_start = window_start.max(range_start);
        }
        if day == range_end.date() {
            window_end = window_end.min(range_end);
        }
        if window_start >= window_end {
            return;
        }

        let mut intervals = Vec::new();
        for event in busy {
            if event.all_day {
                if event.covers_date(day) {
                    return;
                }
                continue;
            }
            if let Some(clipped) =
                BusyInterval::new(event.start, event.end).clip(window_start, window_end)
            {
                intervals.push(clipped);
            }
        }

        let mut cursor = window_start;
        for interval in merge_intervals(intervals) {
            if interval.start > cursor {
                out.push(FreeSlot::new(day, cursor.time(), interval.start.time()));
            }
            cursor = cursor.max(interval.end);
        }
        if cursor < window_end {
            out.push(FreeSlot::new(day, cursor.time(), window_end.time()));
        }
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Convenience function to find slots with an explicit policy.
pub fn find_free_slots(
    busy: &[CalendarEvent],
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    policy: WorkingHours,
) -> Result<Vec<FreeSlot>> {
    FreeSlotFinder::new(policy)?.find(busy, range_start, range_end)
}

/// Sum of slot lengths in hours.
pub fn total_hours(slots: &[FreeSlot]) -> f64 {
    slots.iter().map(FreeSlot::hours).sum()
}
