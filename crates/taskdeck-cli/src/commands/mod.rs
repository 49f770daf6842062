//! Subcommands and the flag handling they share.

pub mod accept;
pub mod config;
pub mod slots;
pub mod suggest;

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use clap::Args;
use serde::de::DeserializeOwned;
use taskdeck_core::{offset_from_minutes, Config, WorkingHours};

/// Per-invocation overrides of the configured working-hours policy.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// First working hour of the day (0-23)
    #[arg(long)]
    pub work_start: Option<u32>,
    /// Hour the working day ends (0-23)
    #[arg(long)]
    pub work_end: Option<u32>,
    /// Offer slots on Saturdays and Sundays
    #[arg(long)]
    pub include_weekends: bool,
    /// Civil time zone as minutes east of UTC
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset_minutes: Option<i32>,
}

impl PolicyArgs {
    /// Merge flags over the configured values and validate the result.
    pub fn resolve(
        &self,
        config: &Config,
    ) -> Result<(WorkingHours, FixedOffset), Box<dyn std::error::Error>> {
        let scheduling = &config.scheduling;
        let policy = WorkingHours::new(
            self.work_start.unwrap_or(scheduling.work_start_hour),
            self.work_end.unwrap_or(scheduling.work_end_hour),
            scheduling.skip_weekends && !self.include_weekends,
        );
        policy.validate()?;

        let offset = offset_from_minutes(
            self.utc_offset_minutes
                .unwrap_or(scheduling.utc_offset_minutes),
        )?;
        Ok((policy, offset))
    }
}

/// Read and parse a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    tracing::debug!(path = %path.display(), "reading input file");
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
    Ok(value)
}

/// Parse an RFC 3339 instant, or return the current time.
pub fn parse_instant(value: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match value {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid timestamp '{s}': {e}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

pub fn format_span(start: NaiveTime, end: NaiveTime) -> String {
    format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
}
