//! Free time detection.
//!
//! This module provides:
//! - Busy interval clipping and merging
//! - Free slot generation over a date range under a working-hours policy

mod finder;
mod interval;

pub use finder::{find_free_slots, total_hours, FreeSlotFinder};
pub use interval::{merge_intervals, BusyInterval};
