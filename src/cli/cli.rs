use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorChoice, LogLevel};

/// Maintain an in-memory directory tree through CREATE, DELETE, MOVE and LIST commands.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Colour failure reports
    #[clap(long, default_value = "auto", value_enum)]
    pub color: ColorChoice,

    /// Read commands from this file instead of standard input
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// YAML file listing directories to create before reading commands
    #[clap(long)]
    pub seed: Option<PathBuf>,

    /// Print every command before executing it
    #[clap(long)]
    pub echo: bool,
}
