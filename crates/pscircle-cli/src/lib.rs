//! CLI logic for the pscircle process tree tool.
//!
//! Reads a process listing from a file or stdin, lays it out and writes the
//! text report to a file or stdout.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::{ConfigError, load_config};

use std::{
    fs::{self, File},
    io::{self, Write},
};

use log::info;

use pscircle::{CircleBuilder, PscircleError};

/// Run the pscircle CLI application
///
/// # Errors
///
/// Returns `PscircleError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed process listings
pub fn run(args: &Args) -> Result<(), PscircleError> {
    info!(
        input_path:? = args.input_path(),
        output_path:? = args.output;
        "Processing process listing"
    );

    let app_config = load_config(args.config.as_ref())?;
    let builder = CircleBuilder::new(app_config);

    let mut procs = match args.input_path() {
        Some(path) => builder.parse_reader(File::open(path)?)?,
        None => builder.parse_reader(io::stdin().lock())?,
    };

    let layout = builder.layout(&mut procs)?;
    let report = builder.render_report(&procs, &layout);

    match &args.output {
        Some(path) => {
            fs::write(path, report)?;
            info!(output_file:% = path; "Report written");
        }
        None => io::stdout().lock().write_all(report.as_bytes())?,
    }

    Ok(())
}
