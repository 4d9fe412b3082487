//! Error types for the conversion pipeline.
//!
//! The ZIP layer reports failures through [`anyhow`]; everything above it
//! converts into [`ConvertError`], which the archive processor then folds into
//! an [`Outcome`](crate::Outcome).

use std::io::Error as IoError;
use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

/// Everything that can go wrong while converting a single archive.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The scratch directory next to the archive could not be created.
    #[error("failed to create scratch directory in {dir}: {source}")]
    Scratch {
        /// Directory the scratch space was requested in.
        dir: PathBuf,
        #[source]
        source: IoError,
    },

    /// The archive could not be read or unpacked.
    #[error("failed to extract archive: {0:#}")]
    Extract(anyhow::Error),

    /// The archive held nothing that could become a frame.
    #[error("{0}")]
    NoFrames(String),

    /// A frame file could not be opened or sniffed.
    #[error("failed to read frame {path}: {source}")]
    ReadFrame {
        /// Path of the offending file, relative to the archive root.
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// One frame failed to decode; the whole archive is abandoned.
    #[error("failed to decode frame {path}: {source}")]
    Decode {
        /// Path of the offending file, relative to the archive root.
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// The GIF writer rejected the frames or the output could not be written.
    #[error("failed to encode GIF {path}: {reason}")]
    Encode {
        /// Output path that was being written.
        path: PathBuf,
        /// What the encoder complained about.
        reason: String,
    },

    /// An I/O error outside extraction and encoding.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Task(String),
}

impl ConvertError {
    /// Whether this is an "empty archive" condition rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, ConvertError::NoFrames(_))
    }
}

impl From<tokio::task::JoinError> for ConvertError {
    fn from(error: tokio::task::JoinError) -> Self {
        ConvertError::Task(error.to_string())
    }
}
