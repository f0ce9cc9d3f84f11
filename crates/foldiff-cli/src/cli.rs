use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "foldiff",
    about = "Line diff with foldable unchanged regions",
    version
)]
pub struct Cli {
    /// Original file
    pub original: PathBuf,
    /// Modified file
    pub modified: PathBuf,

    /// Session configuration (TOML); flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Compare lines with leading and trailing whitespace trimmed
    #[arg(long)]
    pub ignore_trim_whitespace: Option<bool>,

    /// Diff time budget in milliseconds; 0 means unbounded
    #[arg(long)]
    pub max_computation_time_ms: Option<u64>,

    /// Unfold the region hiding this modified line (repeatable)
    #[arg(long = "reveal-modified", value_name = "LINE")]
    pub reveal_modified: Vec<usize>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
