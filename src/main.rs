//! razor-settings - inspect Razor module settings and themes
//!
//! Resolves settings files and themes the same way Razor modules do: the
//! user config directory first, then the system-wide installation prefixes.

mod cli;

use anyhow::Result;
use clap::Parser;

/// razor-settings - inspect Razor module settings and themes
#[derive(Parser, Debug)]
#[command(name = "razor-settings")]
#[command(about = "Inspect Razor module settings and themes", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_path) = cli::init_logging(args.debug)? {
        eprintln!("Debug logging to: {}", log_path.display());
    }

    cli::handle_command(args.command)
}
