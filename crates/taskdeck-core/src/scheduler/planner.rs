//! Planning facade: calendar feed + task records in, schedule plan out.
//!
//! The policy and the civil offset are passed in explicitly for every
//! planner; nothing is cached between requests.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScheduleSuggester;
use crate::calendar::{normalize_events, RawCalendarEvent};
use crate::error::Result;
use crate::schedule::{
    partition_tasks, CalendarEvent, ScheduleSuggestion, TaskRecord, UnschedulableTask,
    WorkingHours,
};
use crate::storage::Config;
use crate::timeline::FreeSlotFinder;

/// Everything the caller renders after a planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    pub suggestions: Vec<ScheduleSuggestion>,
    pub unschedulable: Vec<UnschedulableTask>,
    pub total_free_hours: f64,
    /// Tasks skipped for lack of a due date or estimate.
    pub unestimated_count: usize,
    pub range_start: NaiveDateTime,
    pub range_end: NaiveDateTime,
}

impl SchedulePlan {
    fn empty(range_start: NaiveDateTime, unestimated_count: usize) -> Self {
        Self {
            suggestions: Vec::new(),
            unschedulable: Vec::new(),
            total_free_hours: 0.0,
            unestimated_count,
            range_start,
            range_end: range_start,
        }
    }

    pub fn suggested_hours(&self) -> f64 {
        self.suggestions.iter().map(|s| s.hours).sum()
    }
}

/// Runs slot finding and suggestion for one request.
pub struct SchedulePlanner {
    finder: FreeSlotFinder,
    suggester: ScheduleSuggester,
    offset: FixedOffset,
}

impl SchedulePlanner {
    /// Create a planner, rejecting an invalid policy.
    pub fn new(policy: WorkingHours, offset: FixedOffset) -> Result<Self> {
        Ok(Self {
            finder: FreeSlotFinder::new(policy)?,
            suggester: ScheduleSuggester::new(),
            offset,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.scheduling.working_hours(), config.scheduling.offset()?)
    }

    pub fn policy(&self) -> &WorkingHours {
        self.finder.policy()
    }

    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    /// Civil "now" in the planner's offset.
    pub fn civil(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// Plan from the provider feed and stored task records.
    pub fn plan(
        &self,
        now: DateTime<Utc>,
        events: &[RawCalendarEvent],
        tasks: &[TaskRecord],
    ) -> Result<SchedulePlan> {
        let busy = normalize_events(events, &self.offset)?;
        self.plan_with_events(now, &busy, tasks)
    }

    /// Plan from already-normalized busy intervals.
    pub fn plan_with_events(
        &self,
        now: DateTime<Utc>,
        busy: &[CalendarEvent],
        tasks: &[TaskRecord],
    ) -> Result<SchedulePlan> {
        let intake = partition_tasks(tasks, &self.offset)?;
        let range_start = self.civil(now);

        let Some(latest_due) = intake.schedulable.iter().map(|t| t.due_date).max() else {
            tracing::info!(
                unestimated = intake.unestimated_count(),
                "no schedulable tasks"
            );
            return Ok(SchedulePlan::empty(range_start, intake.unestimated_count()));
        };

        // Every task already overdue: keep an empty horizon rather than an
        // inverted one.
        let range_end = (latest_due + Duration::days(1)).max(range_start);

        let slots = self.finder.find(busy, range_start, range_end)?;
        let result = self.suggester.suggest(&intake.schedulable, &slots);

        tracing::info!(
            tasks = intake.schedulable.len(),
            slots = slots.len(),
            suggestions = result.suggestions.len(),
            unschedulable = result.unschedulable.len(),
            free_hours = result.total_free_hours,
            "schedule plan computed"
        );

        Ok(SchedulePlan {
            suggestions: result.suggestions,
            unschedulable: result.unschedulable,
            total_free_hours: result.total_free_hours,
            unestimated_count: intake.unestimated_count(),
            range_start,
            range_end,
        })
    }
}
