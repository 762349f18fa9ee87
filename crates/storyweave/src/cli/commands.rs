//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Read and inspect branching interactive stories.
#[derive(Parser, Debug)]
#[command(name = "storyweave")]
#[command(about = "Storyweave - Branching interactive story reader")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a story file and report its pages and any inconsistencies
    Inspect {
        /// Path to the story JSON file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = InspectOutputFormat::Human)]
        format: InspectOutputFormat,

        /// Treat the file as a record of pages keyed by id
        #[arg(long)]
        page_record: bool,
    },

    /// Read a story interactively in the terminal
    Read {
        /// Path to the story JSON file
        file: PathBuf,

        /// Path to reader configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the transition delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Treat the file as a record of pages keyed by id
        #[arg(long)]
        page_record: bool,
    },
}

/// Output format for the inspect command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InspectOutputFormat {
    /// Human-readable report
    Human,
    /// JSON document with pages and trace
    Json,
}
