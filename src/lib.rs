//! # zip2gif
//!
//! Batch-convert ZIP archives of sequentially numbered JPEG frames into
//! animated GIFs.
//!
//! Every `*.zip` under a folder is unpacked into a scratch directory beside
//! it, its JPEGs are decoded in path order and written as an endlessly
//! looping GIF next to the archive (`clip@100ms.zip` becomes
//! `clip@100ms.gif`). Archives are processed concurrently by a bounded pool,
//! and an archive whose GIF already exists is skipped, so re-running a batch
//! is cheap.
//!
//! ## Features
//!
//! - Per-archive frame duration from an `@<N>ms` tag in the file name (default 40 ms)
//! - STORED and DEFLATE ZIP entries, ZIP64, CRC-32 verification
//! - Failures are isolated per archive and reported as [`Outcome`]s
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zip2gif::{BatchOptions, Outcome, run_batch};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tally = run_batch(Path::new("clips"), &BatchOptions::default(), |archive, outcome| {
//!         if let Outcome::Error(reason) = outcome {
//!             eprintln!("{}: {}", archive.display(), reason);
//!         }
//!     })
//!     .await?;
//!
//!     println!("{tally}");
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod batch;
pub mod cli;
pub mod error;
pub mod frames;
pub mod interval;
pub mod io;
pub mod logging;
pub mod processor;
pub mod zip;

pub use animation::{GifOptions, encode_gif};
pub use batch::{BatchOptions, BatchTally, discover_archives, run_batch, worker_count};
pub use cli::Cli;
pub use error::ConvertError;
pub use frames::load_frames;
pub use interval::{DEFAULT_FRAME_DURATION_MS, frame_duration_ms};
pub use io::{LocalFileReader, ReadAt};
pub use processor::{Outcome, output_path, process_archive};
pub use zip::{ZipExtractor, ZipFileEntry, extract_archive};
