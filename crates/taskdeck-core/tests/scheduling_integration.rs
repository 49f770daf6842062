//! Integration tests for free slot finding and schedule suggestion.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use taskdeck_core::{
    find_free_slots, generate_schedule_suggestions, BlockLedger, CalendarEvent, FreeSlot,
    Priority, RawCalendarEvent, SchedulableTask, SchedulePlanner, TaskRecord, WorkingHours,
};

// 2026-03-02 is a Monday.
fn d() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_time(t(hour, 0))
}

fn next(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_add_days(chrono::Days::new(n)).unwrap()
}

#[test]
fn single_slot_single_task() {
    let slots = vec![FreeSlot::new(d(), t(9, 0), t(18, 0))];
    let tasks = vec![SchedulableTask::new(
        "task-a",
        "Draft proposal",
        at(next(d(), 1), 0),
        4.0,
        Priority::P1,
    )];

    let result = generate_schedule_suggestions(&tasks, &slots);

    assert_eq!(result.suggestions.len(), 1);
    let s = &result.suggestions[0];
    assert_eq!((s.date, s.start, s.end, s.hours), (d(), t(9, 0), t(13, 0), 4.0));
    assert!(result.unschedulable.is_empty());
}

#[test]
fn oversized_task_reports_shortfall() {
    let slots = vec![FreeSlot::new(d(), t(9, 0), t(18, 0))];
    let tasks = vec![SchedulableTask::new(
        "task-b",
        "Migrate database",
        at(next(d(), 1), 0),
        12.0,
        Priority::P1,
    )];

    let result = generate_schedule_suggestions(&tasks, &slots);

    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].hours, 9.0);
    assert_eq!(
        (result.suggestions[0].start, result.suggestions[0].end),
        (t(9, 0), t(18, 0))
    );
    assert_eq!(result.unschedulable.len(), 1);
    assert_eq!(result.unschedulable[0].task_id, "task-b");
    assert_eq!(result.unschedulable[0].reason, "3 hours short");
}

#[test]
fn meeting_splits_weekday() {
    let busy = vec![CalendarEvent::timed(at(d(), 10), at(d(), 11))];
    let slots = find_free_slots(&busy, at(d(), 0), at(d(), 23), WorkingHours::new(9, 18, true))
        .unwrap();

    assert_eq!(
        slots,
        vec![
            FreeSlot::new(d(), t(9, 0), t(10, 0)),
            FreeSlot::new(d(), t(11, 0), t(18, 0)),
        ]
    );
}

#[test]
fn saturday_produces_no_slots_when_skipping_weekends() {
    let saturday = next(d(), 5);
    let busy = vec![CalendarEvent::timed(at(saturday, 10), at(saturday, 11))];
    let slots = find_free_slots(
        &busy,
        at(next(d(), 4), 0),
        at(next(d(), 7), 23),
        WorkingHours::default(),
    )
    .unwrap();

    assert!(slots.iter().all(|s| s.date != saturday));
    assert!(slots.iter().all(|s| s.date != next(d(), 6)));
    // Friday and the following Monday remain.
    assert_eq!(slots.len(), 2);
}

#[test]
fn p0_allocated_before_p2_on_same_due_date() {
    let slots = vec![
        FreeSlot::new(d(), t(9, 0), t(12, 0)),
        FreeSlot::new(next(d(), 1), t(9, 0), t(12, 0)),
    ];
    let due = at(next(d(), 3), 0);
    let tasks = vec![
        SchedulableTask::new("p2", "Refactor", due, 3.0, Priority::P2),
        SchedulableTask::new("p0", "Hotfix", due, 3.0, Priority::P0),
    ];

    let result = generate_schedule_suggestions(&tasks, &slots);

    assert_eq!(result.suggestions[0].task_id, "p0");
    assert_eq!(result.suggestions[0].date, d());
    assert_eq!(result.suggestions[0].start, t(9, 0));
    assert_eq!(result.suggestions[1].task_id, "p2");
    assert_eq!(result.suggestions[1].date, next(d(), 1));
}

#[test]
fn end_to_end_plan_from_provider_json() {
    let events: Vec<RawCalendarEvent> = serde_json::from_str(
        r#"[
            {"id": "standup", "start": {"dateTime": "2026-03-02T09:00:00Z"}, "end": {"dateTime": "2026-03-02T09:30:00Z"}},
            {"id": "offsite", "start": {"date": "2026-03-03"}, "end": {"date": "2026-03-04"}},
            {"id": "moved", "status": "cancelled", "start": {"dateTime": "2026-03-02T13:00:00Z"}, "end": {"dateTime": "2026-03-02T17:00:00Z"}}
        ]"#,
    )
    .unwrap();
    let tasks: Vec<TaskRecord> = serde_json::from_str(
        r#"[
            {"id": "design", "title": "Write design doc", "dueDate": "2026-03-05", "estimatedHours": 10, "priority": "P1"},
            {"id": "bugs", "title": "Triage bugs", "dueDate": "2026-03-03T12:00:00Z", "estimatedHours": 2, "priority": "P0"},
            {"id": "idea", "title": "Someday", "priority": "P3"},
            {"id": "done", "title": "Shipped", "dueDate": "2026-03-03", "estimatedHours": 1, "status": "DONE"}
        ]"#,
    )
    .unwrap();

    let utc = chrono::FixedOffset::east_opt(0).unwrap();
    let planner = SchedulePlanner::new(WorkingHours::default(), utc).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
    let plan = planner.plan(now, &events, &tasks).unwrap();

    assert_eq!(plan.unestimated_count, 1);

    // Bugs (due Tuesday) first, into Monday after standup.
    assert_eq!(plan.suggestions[0].task_id, "bugs");
    assert_eq!(plan.suggestions[0].date, d());
    assert_eq!(
        (plan.suggestions[0].start, plan.suggestions[0].end),
        (t(9, 30), t(11, 30))
    );

    // Design gets the rest of Monday (6.5h), Tuesday is the offsite, then
    // Wednesday until 12:30.
    let design: Vec<_> = plan.suggestions.iter().filter(|s| s.task_id == "design").collect();
    assert_eq!(design.len(), 2);
    assert_eq!((design[0].date, design[0].start, design[0].end), (d(), t(11, 30), t(18, 0)));
    assert_eq!(
        (design[1].date, design[1].start, design[1].end),
        (next(d(), 2), t(9, 0), t(12, 30))
    );
    assert!(plan.unschedulable.is_empty());

    // Mon 8.5h + Wed 9h + Thu 9h; Tuesday is blocked, Friday clipped away.
    assert_eq!(plan.total_free_hours, 26.5);
}

#[test]
fn accepting_plan_suggestions_is_idempotent() {
    let slots = vec![FreeSlot::new(d(), t(9, 0), t(18, 0))];
    let tasks = vec![SchedulableTask::new("a", "A", at(next(d(), 1), 0), 2.0, Priority::P2)];

    let first = generate_schedule_suggestions(&tasks, &slots);
    let second = generate_schedule_suggestions(&tasks, &slots);
    assert_eq!(first, second);

    let mut ledger = BlockLedger::new();
    assert!(ledger.accept(&first.suggestions[0]).is_created());
    assert!(!ledger.accept(&second.suggestions[0]).is_created());
    assert_eq!(ledger.len(), 1);
}
