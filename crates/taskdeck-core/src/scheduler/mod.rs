//! Deadline-driven schedule suggestions.
//!
//! This module provides:
//! - Earliest-deadline-first greedy allocation of task estimates into free slots
//! - Splitting of a task across several slots when one is not enough
//! - Reporting of tasks whose estimate does not fit before their due date
//! - A planning facade that wires calendar feed, task intake and slot finding

use chrono::{Duration, NaiveTime};

use crate::schedule::{
    FreeSlot, SchedulableTask, ScheduleSuggestion, ScheduleSuggestions, UnschedulableTask,
};
use crate::timeline::total_hours;

pub mod planner;

pub use planner::{SchedulePlan, SchedulePlanner};

/// Tolerance for float comparisons on hour quantities.
const EPSILON: f64 = 1e-9;

/// Greedy EDF allocator.
///
/// Tasks are processed by due date, then priority, then input order. Each
/// task eats slots front-to-back starting from the earliest one strictly
/// before its due date. There is no backtracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleSuggester;

impl ScheduleSuggester {
    pub fn new() -> Self {
        Self
    }

    /// Allocate `tasks` into `slots`.
    ///
    /// Never fails: a task that does not fit is reported in
    /// `unschedulable` with its shortfall. `total_free_hours` is measured
    /// before any allocation. Tasks whose estimate is not a positive finite
    /// number are skipped and get no slot time.
    pub fn suggest(&self, tasks: &[SchedulableTask], slots: &[FreeSlot]) -> ScheduleSuggestions {
        let total_free_hours = total_hours(slots);

        let mut slot_order: Vec<usize> = (0..slots.len()).collect();
        slot_order.sort_by_key(|&i| (slots[i].date, slots[i].start));

        // Hours already handed out from the front of each slot, by slot index.
        let mut consumed = vec![0.0_f64; slots.len()];

        let mut suggestions = Vec::new();
        let mut unschedulable = Vec::new();

        for task_idx in processing_order(tasks) {
            let task = &tasks[task_idx];
            if !task.estimated_hours.is_finite() || task.estimated_hours <= 0.0 {
                tracing::warn!(
                    task_id = %task.id,
                    estimate = task.estimated_hours,
                    "skipping task without a usable estimate"
                );
                continue;
            }
            let due_day = task.due_date.date();
            let mut remaining = task.estimated_hours;

            for &slot_idx in &slot_order {
                if remaining <= EPSILON {
                    break;
                }
                let slot = &slots[slot_idx];
                if slot.date >= due_day {
                    continue;
                }

                let capacity = slot.hours() - consumed[slot_idx];
                if capacity <= EPSILON {
                    continue;
                }

                let chunk = remaining.min(capacity);
                let start = offset_time(slot.start, consumed[slot_idx]);
                let end = if capacity - chunk <= EPSILON {
                    consumed[slot_idx] = slot.hours();
                    slot.end
                } else {
                    consumed[slot_idx] += chunk;
                    offset_time(slot.start, consumed[slot_idx])
                };
                remaining -= chunk;

                tracing::debug!(
                    task_id = %task.id,
                    date = %slot.date,
                    %start,
                    %end,
                    hours = chunk,
                    "allocated chunk"
                );

                suggestions.push(ScheduleSuggestion {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    date: slot.date,
                    start,
                    end,
                    hours: chunk,
                });
            }

            if remaining > EPSILON {
                tracing::debug!(
                    task_id = %task.id,
                    shortfall = remaining,
                    "task does not fit before due date"
                );
                unschedulable.push(UnschedulableTask::new(task, remaining));
            }
        }

        ScheduleSuggestions {
            suggestions,
            unschedulable,
            total_free_hours,
        }
    }
}

/// Indices of `tasks` sorted by due date, priority rank, then input order.
fn processing_order(tasks: &[SchedulableTask]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        tasks[a]
            .due_date
            .cmp(&tasks[b].due_date)
            .then_with(|| tasks[a].priority.rank().cmp(&tasks[b].priority.rank()))
            .then_with(|| a.cmp(&b))
    });
    order
}

fn offset_time(start: NaiveTime, hours: f64) -> NaiveTime {
    start + Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Convenience function to run the suggester.
pub fn generate_schedule_suggestions(
    tasks: &[SchedulableTask],
    slots: &[FreeSlot],
) -> ScheduleSuggestions {
    ScheduleSuggester::new().suggest(tasks, slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Priority;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn due(d: u32) -> NaiveDateTime {
        day(d).and_time(NaiveTime::MIN)
    }

    fn make_test_task(id: &str, due_day: u32, hours: f64, priority: Priority) -> SchedulableTask {
        SchedulableTask::new(id, format!("Task {}", id), due(due_day), hours, priority)
    }

    #[test]
    fn single_task_fits_in_first_slot() {
        let slots = vec![FreeSlot::new(day(2), t(9, 0), t(18, 0))];
        let tasks = vec![make_test_task("a", 3, 4.0, Priority::P2)];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(
            result.suggestions,
            vec![ScheduleSuggestion {
                task_id: "a".into(),
                title: "Task a".into(),
                date: day(2),
                start: t(9, 0),
                end: t(13, 0),
                hours: 4.0,
            }]
        );
        assert!(result.unschedulable.is_empty());
        assert_eq!(result.total_free_hours, 9.0);
    }

    #[test]
    fn overflow_is_reported_as_shortfall() {
        let slots = vec![FreeSlot::new(day(2), t(9, 0), t(18, 0))];
        let tasks = vec![make_test_task("a", 3, 12.0, Priority::P2)];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].start, t(9, 0));
        assert_eq!(result.suggestions[0].end, t(18, 0));
        assert_eq!(result.unschedulable.len(), 1);
        assert_eq!(result.unschedulable[0].task_id, "a");
        assert_eq!(result.unschedulable[0].shortfall_hours, 3.0);
        assert_eq!(result.unschedulable[0].reason, "3 hours short");
    }

    #[test]
    fn task_splits_across_slots() {
        let slots = vec![
            FreeSlot::new(day(2), t(9, 0), t(10, 0)),
            FreeSlot::new(day(2), t(11, 0), t(18, 0)),
        ];
        let tasks = vec![make_test_task("a", 3, 2.5, Priority::P2)];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(
            (result.suggestions[0].start, result.suggestions[0].end),
            (t(9, 0), t(10, 0))
        );
        assert_eq!(
            (result.suggestions[1].start, result.suggestions[1].end),
            (t(11, 0), t(12, 30))
        );
        assert_eq!(result.allocated_hours("a"), 2.5);
    }

    #[test]
    fn slots_on_or_after_due_date_are_ineligible() {
        let slots = vec![
            FreeSlot::new(day(2), t(9, 0), t(10, 0)),
            FreeSlot::new(day(3), t(9, 0), t(18, 0)),
        ];
        let tasks = vec![make_test_task("a", 3, 2.0, Priority::P2)];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].date, day(2));
        assert_eq!(result.unschedulable[0].shortfall_hours, 1.0);
        assert_eq!(result.unschedulable[0].reason, "1 hour short");
    }

    #[test]
    fn earlier_deadline_goes_first() {
        let slots = vec![
            FreeSlot::new(day(2), t(9, 0), t(13, 0)),
            FreeSlot::new(day(3), t(9, 0), t(13, 0)),
        ];
        let tasks = vec![
            make_test_task("late", 5, 4.0, Priority::P0),
            make_test_task("soon", 3, 4.0, Priority::P3),
        ];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions[0].task_id, "soon");
        assert_eq!(result.suggestions[0].date, day(2));
        assert_eq!(result.suggestions[1].task_id, "late");
        assert_eq!(result.suggestions[1].date, day(3));
        assert!(result.unschedulable.is_empty());
    }

    #[test]
    fn priority_breaks_due_date_ties() {
        let slots = vec![FreeSlot::new(day(2), t(9, 0), t(18, 0))];
        let tasks = vec![
            make_test_task("p2", 4, 3.0, Priority::P2),
            make_test_task("p0", 4, 3.0, Priority::P0),
        ];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions[0].task_id, "p0");
        assert_eq!(
            (result.suggestions[0].start, result.suggestions[0].end),
            (t(9, 0), t(12, 0))
        );
        assert_eq!(result.suggestions[1].task_id, "p2");
        assert_eq!(result.suggestions[1].start, t(12, 0));
    }

    #[test]
    fn input_order_breaks_full_ties() {
        let slots = vec![FreeSlot::new(day(2), t(9, 0), t(18, 0))];
        let tasks = vec![
            make_test_task("first", 4, 1.0, Priority::P1),
            make_test_task("second", 4, 1.0, Priority::P1),
        ];

        let result = generate_schedule_suggestions(&tasks, &slots);
        let ids: Vec<_> = result.suggestions.iter().map(|s| s.task_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn unsorted_slots_are_scanned_chronologically() {
        let slots = vec![
            FreeSlot::new(day(3), t(9, 0), t(18, 0)),
            FreeSlot::new(day(2), t(14, 0), t(18, 0)),
            FreeSlot::new(day(2), t(9, 0), t(10, 0)),
        ];
        let tasks = vec![make_test_task("a", 5, 2.0, Priority::P2)];

        let result = generate_schedule_suggestions(&tasks, &slots);
        assert_eq!(
            (result.suggestions[0].date, result.suggestions[0].start),
            (day(2), t(9, 0))
        );
        assert_eq!(
            (result.suggestions[1].date, result.suggestions[1].start),
            (day(2), t(14, 0))
        );
    }

    #[test]
    fn no_slots_means_everything_unschedulable() {
        let tasks = vec![make_test_task("a", 3, 2.0, Priority::P2)];
        let result = generate_schedule_suggestions(&tasks, &[]);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.unschedulable[0].shortfall_hours, 2.0);
        assert_eq!(result.total_free_hours, 0.0);
    }

    #[test]
    fn total_free_hours_ignores_consumption() {
        let slots = vec![
            FreeSlot::new(day(2), t(9, 0), t(12, 0)),
            FreeSlot::new(day(9), t(9, 0), t(12, 0)),
        ];
        let tasks = vec![make_test_task("a", 3, 3.0, Priority::P2)];
        let result = generate_schedule_suggestions(&tasks, &slots);
        assert_eq!(result.total_free_hours, 6.0);
    }

    #[test]
    fn unusable_estimates_do_not_consume_slots() {
        let slots = vec![FreeSlot::new(day(2), t(9, 0), t(18, 0))];
        let tasks = vec![
            make_test_task("nan", 3, f64::NAN, Priority::P0),
            make_test_task("inf", 3, f64::INFINITY, Priority::P0),
            make_test_task("neg", 3, -2.0, Priority::P0),
            make_test_task("ok", 3, 2.0, Priority::P1),
        ];

        let result = generate_schedule_suggestions(&tasks, &slots);

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].task_id, "ok");
        assert_eq!(
            (result.suggestions[0].start, result.suggestions[0].end),
            (t(9, 0), t(11, 0))
        );
        assert!(result.unschedulable.is_empty());
    }
}
