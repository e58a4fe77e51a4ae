use clap::Parser;
use std::path::PathBuf;

/// Aspect-wrapped calculator demo
#[derive(Parser, Debug)]
#[command(name = "calculator")]
#[command(version, about = "Runs arithmetic operations through aspect chains", long_about = None)]
pub struct Cli {
    /// Path to a JSON5 calculator config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Emit log lines as JSON
    #[arg(long)]
    pub json: bool,
}
