//! Per-archive conversion and outcome classification.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::animation::{GifOptions, encode_gif};
use crate::error::ConvertError;
use crate::frames::load_frames;
use crate::interval::frame_duration_ms;

/// Extension of the animations written beside each archive.
pub const OUTPUT_EXTENSION: &str = "gif";

/// Result of processing one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The GIF was written to the contained path.
    Success(PathBuf),
    /// Nothing was done; the reason says why.
    Skip(String),
    /// The archive had no usable frames. Not counted as a failure.
    Warning(String),
    /// The archive could not be converted.
    Error(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl From<ConvertError> for Outcome {
    fn from(error: ConvertError) -> Self {
        if error.is_warning() {
            Outcome::Warning(error.to_string())
        } else {
            Outcome::Error(error.to_string())
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(path) => write!(f, "created {}", path.display()),
            Outcome::Skip(reason) => write!(f, "skipped: {reason}"),
            Outcome::Warning(reason) => write!(f, "warning: {reason}"),
            Outcome::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// Path of the GIF produced for `archive`: same directory, `.gif` extension.
pub fn output_path(archive: &Path) -> PathBuf {
    archive.with_extension(OUTPUT_EXTENSION)
}

/// Convert one archive into a GIF beside it.
///
/// Never fails: every problem is folded into the returned [`Outcome`]. If the
/// GIF already exists the archive is skipped without being opened.
pub async fn process_archive(archive: &Path) -> Outcome {
    let output = output_path(archive);

    match tokio::fs::try_exists(&output).await {
        Ok(true) => return Outcome::Skip("GIF already exists".to_string()),
        Ok(false) => {}
        Err(e) => return Outcome::Error(format!("cannot check {}: {e}", output.display())),
    }

    match convert(archive, output).await {
        Ok(output) => Outcome::Success(output),
        Err(e) => e.into(),
    }
}

async fn convert(archive: &Path, output: PathBuf) -> Result<PathBuf, ConvertError> {
    let file_name = archive
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let options = GifOptions::new().frame_duration_ms(frame_duration_ms(&file_name));

    let scratch_root = match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let frames = load_frames(archive, scratch_root).await?;
    tracing::debug!(
        archive = %archive.display(),
        frames = frames.len(),
        duration_ms = options.frame_duration_ms,
        "frames decoded"
    );

    // Frames move into the blocking task and are freed when it returns
    tokio::task::spawn_blocking(move || {
        encode_gif(&output, &frames, &options)?;
        Ok::<_, ConvertError>(output)
    })
    .await?
}
