//! Storyweave terminal reader.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, handle_inspect_command, handle_read_command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout is reserved for story text
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            file,
            format,
            page_record,
        } => handle_inspect_command(file, format, page_record),
        Commands::Read {
            file,
            config,
            delay_ms,
            page_record,
        } => handle_read_command(file, config, delay_ms, page_record).await,
    }
}
