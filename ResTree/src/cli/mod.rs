//! ResTree CLI - Build character resource trees from world dumps

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "restree")]
#[command(about = "ResTree: resource dependency trees for on-screen characters", long_about = None)]
#[command(version = crate::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the ResTree CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
