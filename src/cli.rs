use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dashboard Access Gate
///
/// Shows an embedded dashboard only during the daily access window
/// (03:00 PM - 05:00 PM, UTC+05:30) and counts down to the next opening
/// the rest of the time.
#[derive(Parser, Debug)]
#[command(name = "dashboard-gate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "dashboard-gate.yaml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive dashboard page (default)
    Run {
        /// Start with developer mode enabled
        #[arg(long = "override")]
        override_enabled: bool,
    },
    /// Evaluate the access window once and print the result
    Status {
        /// Treat the window as always open
        #[arg(long = "override")]
        override_enabled: bool,

        /// Evaluate at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the cache-busted URL a refresh would load
    RefreshUrl {
        /// Visualization URL (defaults to the configured one)
        url: Option<String>,
    },
}
