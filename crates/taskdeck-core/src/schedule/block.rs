//! Accepted suggestions materialized as schedule blocks.
//!
//! A block links a task to a concrete calendar event. Blocks are keyed by
//! `(task_id, date, start_time)` so re-submitting the same suggestion never
//! produces a second block.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use super::ScheduleSuggestion;
use crate::error::{CoreError, Result, ValidationError};

/// A persisted link between a task and a calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub id: String,
    pub task_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hours: f64,
}

impl ScheduleBlock {
    pub fn from_suggestion(suggestion: &ScheduleSuggestion) -> Self {
        let key = idempotency_key(&suggestion.task_id, suggestion.date, suggestion.start);
        Self {
            id: block_id(&key),
            task_id: suggestion.task_id.clone(),
            date: suggestion.date,
            start_time: suggestion.start,
            end_time: suggestion.end,
            hours: suggestion.hours,
        }
    }

    pub fn idempotency_key(&self) -> String {
        idempotency_key(&self.task_id, self.date, self.start_time)
    }

    /// Provider insert payload for the block's calendar event.
    pub fn to_event_draft(&self, title: &str, offset: &FixedOffset) -> Result<serde_json::Value> {
        let start = offset
            .from_local_datetime(&self.date.and_time(self.start_time))
            .single()
            .ok_or_else(|| invalid_block(self, "start time does not exist in offset"))?;
        let end = offset
            .from_local_datetime(&self.date.and_time(self.end_time))
            .single()
            .ok_or_else(|| invalid_block(self, "end time does not exist in offset"))?;

        Ok(json!({
            "summary": title,
            "start": {"dateTime": start.to_rfc3339()},
            "end": {"dateTime": end.to_rfc3339()},
            "extendedProperties": {
                "private": {
                    "taskdeck_task_id": self.task_id,
                    "taskdeck_block_id": self.id,
                    "taskdeck_key": self.idempotency_key(),
                }
            }
        }))
    }
}

fn invalid_block(block: &ScheduleBlock, message: &str) -> CoreError {
    ValidationError::InvalidValue {
        field: format!("block {}", block.id),
        message: message.to_string(),
    }
    .into()
}

fn idempotency_key(task_id: &str, date: NaiveDate, start: NaiveTime) -> String {
    format!("{}:{}:{}", task_id, date.format("%Y-%m-%d"), start.format("%H:%M:%S"))
}

fn block_id(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

/// Outcome of accepting a suggestion.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockAcceptance {
    Created(ScheduleBlock),
    Duplicate(ScheduleBlock),
}

impl BlockAcceptance {
    pub fn block(&self) -> &ScheduleBlock {
        match self {
            BlockAcceptance::Created(block) | BlockAcceptance::Duplicate(block) => block,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, BlockAcceptance::Created(_))
    }
}

/// Accepted blocks, keyed by idempotency key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockLedger {
    #[serde(default)]
    blocks: BTreeMap<String, ScheduleBlock>,
}

impl BlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a suggestion unless an identical one was already accepted.
    pub fn accept(&mut self, suggestion: &ScheduleSuggestion) -> BlockAcceptance {
        let block = ScheduleBlock::from_suggestion(suggestion);
        let key = block.idempotency_key();

        if let Some(existing) = self.blocks.get(&key) {
            tracing::debug!(key = %key, "suggestion already accepted");
            return BlockAcceptance::Duplicate(existing.clone());
        }

        tracing::info!(block_id = %block.id, task_id = %block.task_id, "accepted schedule block");
        self.blocks.insert(key, block.clone());
        BlockAcceptance::Created(block)
    }

    pub fn blocks_for_task<'a>(
        &'a self,
        task_id: &'a str,
    ) -> impl Iterator<Item = &'a ScheduleBlock> {
        self.blocks.values().filter(move |b| b.task_id == task_id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Load a ledger file, or an empty ledger if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
