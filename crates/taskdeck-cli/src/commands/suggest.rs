//! `taskdeck suggest`: place task work before due dates.

use std::path::PathBuf;

use clap::Args;
use taskdeck_core::{Config, RawCalendarEvent, SchedulePlanner, TaskRecord};

use super::{format_span, parse_instant, read_json, PolicyArgs};

#[derive(Args)]
pub struct SuggestArgs {
    /// JSON file with calendar events (provider list format)
    #[arg(long)]
    events: PathBuf,
    /// JSON file with task records
    #[arg(long)]
    tasks: PathBuf,
    /// Planning start as RFC 3339 (default: now)
    #[arg(long)]
    now: Option<String>,
    #[command(flatten)]
    policy: PolicyArgs,
    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (policy, offset) = args.policy.resolve(&config)?;

    let events: Vec<RawCalendarEvent> = read_json(&args.events)?;
    let tasks: Vec<TaskRecord> = read_json(&args.tasks)?;
    let now = parse_instant(args.now.as_deref())?;

    let plan = SchedulePlanner::new(policy, offset)?.plan(now, &events, &tasks)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.suggestions.is_empty() {
        println!("no suggestions");
    } else {
        println!("Suggestions:");
        for s in &plan.suggestions {
            println!(
                "  {}  {}  {} ({}h)",
                s.date,
                format_span(s.start, s.end),
                s.title,
                s.hours
            );
        }
    }

    if !plan.unschedulable.is_empty() {
        println!(
            "{} task(s) could not be scheduled before their deadlines:",
            plan.unschedulable.len()
        );
        for u in &plan.unschedulable {
            println!("  {}: {}", u.title, u.reason);
        }
    }

    println!(
        "Free hours: {}, unestimated tasks: {}",
        plan.total_free_hours, plan.unestimated_count
    );
    Ok(())
}
