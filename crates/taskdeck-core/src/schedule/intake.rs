//! Task intake: split stored tasks into schedulable and unestimated sets.
//!
//! Tasks without a due date or a positive estimate never reach the
//! suggester; they are counted as "unestimated" instead of being reported
//! as unschedulable. Malformed estimates fail the whole request.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Priority, SchedulableTask};
use crate::error::ValidationError;

/// Estimates are entered on a half-hour grid.
pub const ESTIMATE_GRANULARITY_HOURS: f64 = 0.5;

/// Workflow status of a stored task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
}

/// Due date as stored: either a timestamp or a bare calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DueDate {
    At(DateTime<FixedOffset>),
    On(NaiveDate),
}

impl DueDate {
    /// Civil date-time in the application's offset. A bare date means the
    /// start of that day.
    pub fn to_civil(&self, offset: &FixedOffset) -> NaiveDateTime {
        match self {
            DueDate::At(ts) => ts.with_timezone(offset).naive_local(),
            DueDate::On(date) => date.and_time(NaiveTime::MIN),
        }
    }
}

/// A task as returned by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Result of [`partition_tasks`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskIntake {
    pub schedulable: Vec<SchedulableTask>,
    pub unestimated: Vec<TaskRecord>,
}

impl TaskIntake {
    pub fn unestimated_count(&self) -> usize {
        self.unestimated.len()
    }
}

/// Check an estimate that is present and non-zero.
pub fn validate_estimate(task_id: &str, hours: f64) -> Result<(), ValidationError> {
    let invalid = |message: String| ValidationError::InvalidEstimate {
        task_id: task_id.to_string(),
        message,
    };

    if !hours.is_finite() {
        return Err(invalid("estimate must be a finite number".into()));
    }
    if hours < 0.0 {
        return Err(invalid(format!("estimate must be positive, got {hours}")));
    }
    if (hours / ESTIMATE_GRANULARITY_HOURS).fract() != 0.0 {
        return Err(invalid(format!(
            "estimate must be a multiple of {ESTIMATE_GRANULARITY_HOURS} hours, got {hours}"
        )));
    }
    Ok(())
}

/// Split task records into schedulable tasks and unestimated ones.
///
/// Completed tasks are dropped. Input order is preserved in both outputs,
/// which keeps the suggester's tie-break deterministic.
pub fn partition_tasks(
    records: &[TaskRecord],
    offset: &FixedOffset,
) -> Result<TaskIntake, ValidationError> {
    let mut intake = TaskIntake::default();

    for record in records {
        if record.status == TaskStatus::Done {
            continue;
        }

        if let Some(hours) = record.estimated_hours {
            validate_estimate(&record.id, hours)?;
        }

        match (record.due_date, record.estimated_hours) {
            (Some(due), Some(hours)) if hours > 0.0 => {
                intake.schedulable.push(SchedulableTask::new(
                    record.id.clone(),
                    record.title.clone(),
                    due.to_civil(offset),
                    hours,
                    record.priority,
                ));
            }
            _ => intake.unestimated.push(record.clone()),
        }
    }

    tracing::debug!(
        schedulable = intake.schedulable.len(),
        unestimated = intake.unestimated.len(),
        "partitioned task records"
    );

    Ok(intake)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, due: Option<&str>, hours: Option<f64>) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: format!("Task {id}"),
            due_date: due.map(|d| serde_json::from_value(serde_json::json!(d)).unwrap()),
            estimated_hours: hours,
            priority: Priority::P2,
            status: TaskStatus::Todo,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn due_date_accepts_timestamp_and_bare_date() {
        let ts: DueDate = serde_json::from_str("\"2026-03-05T15:00:00+09:00\"").unwrap();
        let day: DueDate = serde_json::from_str("\"2026-03-05\"").unwrap();
        assert!(matches!(ts, DueDate::At(_)));
        assert!(matches!(day, DueDate::On(_)));

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            ts.to_civil(&tokyo).to_string(),
            "2026-03-05 15:00:00"
        );
        assert_eq!(ts.to_civil(&utc()).to_string(), "2026-03-05 06:00:00");
        assert_eq!(day.to_civil(&tokyo).to_string(), "2026-03-05 00:00:00");
    }

    #[test]
    fn partition_separates_unestimated() {
        let records = vec![
            record("a", Some("2026-03-05"), Some(2.0)),
            record("b", None, Some(2.0)),
            record("c", Some("2026-03-05"), None),
            record("d", Some("2026-03-05"), Some(0.0)),
        ];

        let intake = partition_tasks(&records, &utc()).unwrap();
        assert_eq!(intake.schedulable.len(), 1);
        assert_eq!(intake.schedulable[0].id, "a");
        assert_eq!(intake.unestimated_count(), 3);
    }

    #[test]
    fn partition_drops_done_tasks() {
        let mut done = record("done", Some("2026-03-05"), Some(1.0));
        done.status = TaskStatus::Done;
        let mut done_unestimated = record("done-2", None, None);
        done_unestimated.status = TaskStatus::Done;

        let intake = partition_tasks(&[done, done_unestimated], &utc()).unwrap();
        assert!(intake.schedulable.is_empty());
        assert!(intake.unestimated.is_empty());
    }

    #[test]
    fn partition_rejects_malformed_estimates() {
        let negative = record("neg", Some("2026-03-05"), Some(-1.0));
        assert!(matches!(
            partition_tasks(&[negative], &utc()),
            Err(ValidationError::InvalidEstimate { .. })
        ));

        let off_grid = record("odd", Some("2026-03-05"), Some(1.25));
        assert!(partition_tasks(&[off_grid], &utc()).is_err());

        let nan = record("nan", Some("2026-03-05"), Some(f64::NAN));
        assert!(partition_tasks(&[nan], &utc()).is_err());
    }

    #[test]
    fn task_record_deserializes_from_store_json() {
        let json = r#"{
            "id": "t-1",
            "title": "Ship release notes",
            "dueDate": "2026-03-05T18:00:00Z",
            "estimatedHours": 1.5,
            "priority": "P0",
            "status": "IN_PROGRESS"
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.priority, Priority::P0);
        assert_eq!(record.status, TaskStatus::InProgress);
        assert_eq!(record.estimated_hours, Some(1.5));
    }
}
