//! Main entry point for the zip2gif CLI application.
//!
//! Scans a folder for ZIP archives of JPEG frames and converts each into an
//! animated GIF beside it.

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use zip2gif::logging::init_logging;
use zip2gif::{Cli, Outcome, run_batch};

/// Application entry point.
///
/// Parses command-line arguments, runs the batch and prints one line per
/// created GIF, warning and error as they happen, then the final tally.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let quiet = cli.quiet;
    let tally = run_batch(&cli.folder, &cli.batch_options(), |archive, outcome| {
        report(archive, outcome, quiet)
    })
    .await?;

    if tally.total == 0 {
        println!("No ZIP archives found in {}", cli.folder.display());
        return Ok(());
    }

    println!("\n{tally}");
    Ok(())
}

/// Print the console line for one finished archive.
///
/// Skips are silent; everything else gets exactly one line.
fn report(archive: &Path, outcome: &Outcome, quiet: bool) {
    match outcome {
        Outcome::Success(output) => {
            if !quiet {
                println!("✓ Created: {}", output.display());
            }
        }
        Outcome::Skip(_) => {}
        Outcome::Warning(reason) => println!("⚠ Warning: {} - {}", archive.display(), reason),
        Outcome::Error(reason) => println!("✗ Error processing {}: {}", archive.display(), reason),
    }
}
