//! Scheduling domain types: tasks, busy events, free slots and suggestions.
//!
//! All date-times here are civil (zone-local, naive) values. Conversion from
//! the provider's timestamps into the application's fixed offset happens in
//! [`crate::calendar`] and [`intake`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub mod block;
pub mod intake;

pub use block::{BlockAcceptance, BlockLedger, ScheduleBlock};
pub use intake::{partition_tasks, DueDate, TaskIntake, TaskRecord, TaskStatus};

/// Task priority. `P0` is the most urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    #[default]
    P2,
    P3,
}

impl Priority {
    /// Sort rank, lower is processed first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::P0 => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
        }
    }
}

/// Daily working window and weekend rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub skip_weekends: bool,
}

impl WorkingHours {
    pub fn new(work_start_hour: u32, work_end_hour: u32, skip_weekends: bool) -> Self {
        Self {
            work_start_hour,
            work_end_hour,
            skip_weekends,
        }
    }

    /// Reject hours outside 0-23 and empty or inverted windows.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("work_start_hour", self.work_start_hour),
            ("work_end_hour", self.work_end_hour),
        ] {
            if value > 23 {
                return Err(ValidationError::HourOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if self.work_start_hour >= self.work_end_hour {
            return Err(ValidationError::InvalidWorkingHours {
                start: self.work_start_hour,
                end: self.work_end_hour,
            });
        }
        Ok(())
    }

    /// Start of the working window as a time of day.
    ///
    /// Only meaningful on a policy that passed [`validate`](Self::validate).
    pub fn start_time(&self) -> NaiveTime {
        debug_assert!(self.work_start_hour <= 23, "unvalidated work_start_hour");
        NaiveTime::from_hms_opt(self.work_start_hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// End of the working window as a time of day.
    pub fn end_time(&self) -> NaiveTime {
        debug_assert!(self.work_end_hour <= 23, "unvalidated work_end_hour");
        NaiveTime::from_hms_opt(self.work_end_hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self::new(9, 18, true)
    }
}

/// A busy interval from the calendar, already normalized to civil time.
///
/// All-day events carry midnight boundaries with an exclusive end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    pub fn timed(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            all_day: false,
        }
    }

    /// All-day event covering `first..=last`.
    pub fn all_day_span(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last.succ_opt().unwrap_or(last);
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN),
            all_day: true,
        }
    }

    /// Whether an all-day event blocks the given date.
    ///
    /// An end date that is not after the start date is read as a
    /// single-day event.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        let first = self.start.date();
        let end = self.end.date().max(first.succ_opt().unwrap_or(first));
        first <= date && date < end
    }
}

/// A contiguous free interval inside one working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl FreeSlot {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// Slot length in (possibly fractional) hours.
    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }
}

/// A task eligible for scheduling: it has a due date and a positive estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulableTask {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDateTime,
    pub estimated_hours: f64,
    #[serde(default)]
    pub priority: Priority,
}

impl SchedulableTask {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        due_date: NaiveDateTime,
        estimated_hours: f64,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date,
            estimated_hours,
            priority,
        }
    }
}

/// One contiguous chunk of work placed into a free slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestion {
    pub task_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub hours: f64,
}

/// A task whose estimate could not be fully placed before its due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnschedulableTask {
    pub task_id: String,
    pub title: String,
    pub shortfall_hours: f64,
    pub reason: String,
}

impl UnschedulableTask {
    pub fn new(task: &SchedulableTask, shortfall_hours: f64) -> Self {
        let reason = if shortfall_hours == 1.0 {
            "1 hour short".to_string()
        } else {
            format!("{} hours short", shortfall_hours)
        };
        Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            shortfall_hours,
            reason,
        }
    }
}

/// Output of the suggester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestions {
    pub suggestions: Vec<ScheduleSuggestion>,
    pub unschedulable: Vec<UnschedulableTask>,
    pub total_free_hours: f64,
}

impl ScheduleSuggestions {
    /// Hours placed for a single task across all its chunks.
    pub fn allocated_hours(&self, task_id: &str) -> f64 {
        self.suggestions
            .iter()
            .filter(|s| s.task_id == task_id)
            .map(|s| s.hours)
            .sum()
    }
}
