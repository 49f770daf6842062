use clap::{Parser, Subcommand};
use taskdeck_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Taskdeck deadline scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show free working slots between calendar events
    Slots(commands::slots::SlotsArgs),
    /// Suggest when to work on tasks before their due dates
    Suggest(commands::suggest::SuggestArgs),
    /// Accept a suggestion as a schedule block
    Accept(commands::accept::AcceptArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    // Commands load the config again and fail on a broken file; here it
    // only picks the log level.
    match Config::load() {
        Ok(config) => init_tracing(&config.log_level),
        Err(e) => {
            init_tracing(&Config::default().log_level);
            tracing::warn!(error = %e, "config unreadable, logging at default level");
        }
    }

    let result = match cli.command {
        Commands::Slots(args) => commands::slots::run(args),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Accept(args) => commands::accept::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
