//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyweave binary.

mod commands;
mod inspect;
mod read;

pub use commands::{Cli, Commands, InspectOutputFormat};
pub use inspect::handle_inspect_command;
pub use read::handle_read_command;
