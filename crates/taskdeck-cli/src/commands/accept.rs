//! `taskdeck accept`: record a suggestion as a schedule block.

use std::path::PathBuf;

use clap::Args;
use taskdeck_core::{ledger_path, BlockAcceptance, BlockLedger, Config, ScheduleSuggestion};

#[derive(Args)]
pub struct AcceptArgs {
    /// Suggestion as printed by `suggest --json`
    #[arg(long)]
    suggestion: String,
    /// Ledger file (default: data directory)
    #[arg(long)]
    ledger: Option<PathBuf>,
    /// Also print the calendar event payload for the block
    #[arg(long)]
    draft: bool,
}

pub fn run(args: AcceptArgs) -> Result<(), Box<dyn std::error::Error>> {
    let suggestion: ScheduleSuggestion = serde_json::from_str(&args.suggestion)
        .map_err(|e| format!("invalid suggestion: {e}"))?;
    let path = match args.ledger {
        Some(path) => path,
        None => ledger_path()?,
    };

    let mut ledger = BlockLedger::load_from(&path)?;
    let acceptance = ledger.accept(&suggestion);

    match &acceptance {
        BlockAcceptance::Created(block) => {
            ledger.save_to(&path)?;
            println!("created {}", block.id);
        }
        BlockAcceptance::Duplicate(block) => {
            println!("already accepted {}", block.id);
        }
    }

    if args.draft {
        let offset = Config::load()?.scheduling.offset()?;
        let draft = acceptance.block().to_event_draft(&suggestion.title, &offset)?;
        println!("{}", serde_json::to_string_pretty(&draft)?);
    }
    Ok(())
}
