//! Calendar feed normalization.
//!
//! Converts provider events (`{"start": {"dateTime": ...}}` or
//! `{"start": {"date": ...}}`) into civil [`CalendarEvent`]s in the
//! application's fixed offset. Cancelled events are dropped here so the
//! slot finder only ever sees busy time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schedule::CalendarEvent;

/// Event boundary as sent by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// An event from the provider's list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

impl RawCalendarEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.summary.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// Build the fixed civil offset from minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, ValidationError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "utc_offset_minutes".to_string(),
            message: format!("{minutes} is not a valid UTC offset"),
        })
}

/// Normalize a provider feed into busy intervals.
pub fn normalize_events(
    raw: &[RawCalendarEvent],
    offset: &FixedOffset,
) -> Result<Vec<CalendarEvent>, ValidationError> {
    let mut events = Vec::with_capacity(raw.len());

    for event in raw {
        if event.is_cancelled() {
            tracing::warn!(event = %event.label(), "skipping cancelled calendar event");
            continue;
        }
        events.push(normalize_event(event, offset)?);
    }

    Ok(events)
}

fn normalize_event(
    event: &RawCalendarEvent,
    offset: &FixedOffset,
) -> Result<CalendarEvent, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidEvent {
        event: event.label(),
        message: message.to_string(),
    };

    let normalized = match (
        (&event.start.date_time, &event.start.date),
        (&event.end.date_time, &event.end.date),
    ) {
        ((Some(start), _), (Some(end), _)) => CalendarEvent::timed(
            to_civil(start, offset),
            to_civil(end, offset),
        ),
        ((None, Some(start)), (None, Some(end))) => CalendarEvent {
            start: midnight(*start),
            end: midnight(*end),
            all_day: true,
        },
        ((None, None), _) => return Err(invalid("start has neither dateTime nor date")),
        (_, (None, None)) => return Err(invalid("end has neither dateTime nor date")),
        _ => return Err(invalid("start and end mix dateTime and date boundaries")),
    };

    if normalized.end < normalized.start {
        return Err(invalid("end is before start"));
    }

    Ok(normalized)
}

fn to_civil(ts: &DateTime<FixedOffset>, offset: &FixedOffset) -> NaiveDateTime {
    ts.with_timezone(offset).naive_local()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
