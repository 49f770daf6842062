//! # Taskdeck Core Library
//!
//! This library provides the deadline-driven scheduling engine behind the
//! Taskdeck team task manager. Given tasks with due dates and estimates and
//! a calendar of existing commitments, it finds free working time and
//! greedily places task work into it, earliest deadline first.
//!
//! ## Architecture
//!
//! - **Timeline**: Free slot detection under a working-hours policy
//! - **Scheduler**: EDF greedy allocation and the planning facade
//! - **Calendar**: Provider event normalization into civil time
//! - **Schedule**: Domain types, task intake and the acceptance ledger
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FreeSlotFinder`]: Busy intervals + policy -> free slots
//! - [`ScheduleSuggester`]: Free slots + tasks -> suggestions
//! - [`SchedulePlanner`]: One planning request end to end
//! - [`BlockLedger`]: Idempotent acceptance of suggestions
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use calendar::{normalize_events, offset_from_minutes, EventDateTime, RawCalendarEvent};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use schedule::{
    partition_tasks, BlockAcceptance, BlockLedger, CalendarEvent, DueDate, FreeSlot, Priority,
    SchedulableTask, ScheduleBlock, ScheduleSuggestion, ScheduleSuggestions, TaskIntake,
    TaskRecord, TaskStatus, UnschedulableTask, WorkingHours,
};
pub use scheduler::{
    generate_schedule_suggestions, SchedulePlan, SchedulePlanner, ScheduleSuggester,
};
pub use storage::{data_dir, ledger_path, Config, SchedulingConfig};
pub use timeline::{find_free_slots, FreeSlotFinder};
