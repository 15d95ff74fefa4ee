//! Command-line argument definitions for the pscircle CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the pscircle process tree tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Process listing in `pid ppid cpu mem name` form, as printed by
    /// `ps -e -o pid,ppid,pcpu,rss,comm --no-headers`
    #[arg(help = "Path to the process listing, or `-` for stdin")]
    pub input: Option<String>,

    /// Path to the output report; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Returns the input path, or `None` when the listing comes from stdin.
    pub fn input_path(&self) -> Option<&str> {
        self.input.as_deref().filter(|path| *path != "-")
    }
}
