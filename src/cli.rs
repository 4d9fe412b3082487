use std::path::PathBuf;

use clap::Parser;

use crate::batch::BatchOptions;

#[derive(Parser, Debug)]
#[command(name = "zip2gif")]
#[command(version)]
#[command(about = "Convert ZIP archives of JPEG frames into animated GIFs", long_about = None)]
#[command(after_help = "Examples:\n  \
  zip2gif ./clips                 convert every ZIP under ./clips\n  \
  zip2gif ./clips -w 4            use at most 4 concurrent workers\n  \
  zip2gif ./clips -vv             show debug logging on stderr\n\n\
Frame duration comes from an @<N>ms tag in the archive name (clip@100ms.zip),\n\
otherwise 40 ms. Archives whose GIF already exists are skipped.")]
pub struct Cli {
    /// Folder to scan recursively for ZIP archives
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Maximum number of archives processed at once (default: automatic)
    #[arg(short = 'w', long = "workers", value_name = "N", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Do not print a line for each created GIF
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            workers: self.workers,
        }
    }
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("worker count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid worker count: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_is_required() {
        assert!(Cli::try_parse_from(["zip2gif"]).is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["zip2gif", "clips"]).unwrap();
        assert_eq!(cli.folder, PathBuf::from("clips"));
        assert_eq!(cli.workers, None);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn workers_flag() {
        let cli = Cli::try_parse_from(["zip2gif", "clips", "--workers", "3"]).unwrap();
        assert_eq!(cli.batch_options().workers, Some(3));

        let cli = Cli::try_parse_from(["zip2gif", "-w", "7", "clips"]).unwrap();
        assert_eq!(cli.workers, Some(7));
    }

    #[test]
    fn zero_or_garbage_workers_rejected() {
        assert!(Cli::try_parse_from(["zip2gif", "clips", "-w", "0"]).is_err());
        assert!(Cli::try_parse_from(["zip2gif", "clips", "-w", "many"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["zip2gif", "clips", "-vv", "-q"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }
}
