//! `taskdeck slots`: free working time between calendar events.

use std::path::PathBuf;

use clap::Args;
use taskdeck_core::{normalize_events, Config, FreeSlotFinder, RawCalendarEvent};

use super::{format_span, parse_instant, read_json, PolicyArgs};

#[derive(Args)]
pub struct SlotsArgs {
    /// JSON file with calendar events (provider list format)
    #[arg(long)]
    events: PathBuf,
    /// Range start as RFC 3339 (default: now)
    #[arg(long)]
    from: Option<String>,
    /// Range end as RFC 3339
    #[arg(long)]
    to: String,
    #[command(flatten)]
    policy: PolicyArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: SlotsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (policy, offset) = args.policy.resolve(&config)?;

    let raw: Vec<RawCalendarEvent> = read_json(&args.events)?;
    let busy = normalize_events(&raw, &offset)?;

    let from = parse_instant(args.from.as_deref())?
        .with_timezone(&offset)
        .naive_local();
    let to = parse_instant(Some(&args.to))?
        .with_timezone(&offset)
        .naive_local();

    let slots = FreeSlotFinder::new(policy)?.find(&busy, from, to)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&slots)?);
        return Ok(());
    }

    if slots.is_empty() {
        println!("no free slots");
        return Ok(());
    }
    for slot in &slots {
        println!(
            "{}  {}  ({}h)",
            slot.date,
            format_span(slot.start, slot.end),
            slot.hours()
        );
    }
    Ok(())
}
