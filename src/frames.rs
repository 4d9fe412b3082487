//! Frame loading: unpack one archive into scratch space and decode its JPEGs.
//!
//! The scratch directory is a [`TempDir`] created next to the archive, so it is
//! removed on every exit path, and decoding is eager so the directory can go
//! away before encoding starts.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::ConvertError;
use crate::zip;

/// Prefix of scratch directories created beside each archive.
pub const SCRATCH_PREFIX: &str = ".zip2gif-frames-";

/// Extensions recognized as frame images (compared case-insensitively).
pub const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Whether `path` names a frame image.
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

/// Collect every frame image below `dir`, sorted by path string.
///
/// The byte-wise path order is the frame order. Names that are not
/// zero-padded (`frame2.jpg` vs `frame10.jpg`) will not sort numerically.
pub fn collect_frame_paths(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| ConvertError::Io(e.into()))?;
        if entry.file_type().is_file() && is_frame_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(paths)
}

/// Decode every file in `paths`, in order.
///
/// The first failure aborts the whole set; decoded frames are dropped.
/// `root` is only used to report the failing file relative to the archive.
pub fn decode_frames(paths: &[PathBuf], root: &Path) -> Result<Vec<DynamicImage>, ConvertError> {
    let mut frames = Vec::with_capacity(paths.len());

    for path in paths {
        let relative = || path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let read_failed = |source| ConvertError::ReadFrame {
            path: relative(),
            source,
        };

        let frame = ImageReader::open(path)
            .map_err(read_failed)?
            .with_guessed_format()
            .map_err(read_failed)?
            .decode()
            .map_err(|source| ConvertError::Decode {
                path: relative(),
                source,
            })?;
        frames.push(frame);
    }

    Ok(frames)
}

/// Unpack `archive` into a fresh scratch directory under `scratch_root` and
/// decode its frames.
///
/// An archive without any JPEG, or whose JPEGs yield no image, is reported as
/// [`ConvertError::NoFrames`]. The scratch directory is gone when this returns.
pub async fn load_frames(
    archive: &Path,
    scratch_root: &Path,
) -> Result<Vec<DynamicImage>, ConvertError> {
    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(scratch_root)
        .map_err(|source| ConvertError::Scratch {
            dir: scratch_root.to_path_buf(),
            source,
        })?;

    let result = unpack_and_decode(archive, &scratch).await;

    let scratch_path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        tracing::warn!(dir = %scratch_path.display(), error = %e, "failed to remove scratch directory");
    }

    result
}

async fn unpack_and_decode(
    archive: &Path,
    scratch: &TempDir,
) -> Result<Vec<DynamicImage>, ConvertError> {
    let written = zip::extract_archive(archive, scratch.path())
        .await
        .map_err(ConvertError::Extract)?;
    tracing::debug!(archive = %archive.display(), files = written, "archive extracted");

    let root = scratch.path().to_path_buf();
    let frames = tokio::task::spawn_blocking(move || {
        let paths = collect_frame_paths(&root)?;
        if paths.is_empty() {
            return Err(ConvertError::NoFrames("no JPEG files found".to_string()));
        }
        decode_frames(&paths, &root)
    })
    .await??;

    if frames.is_empty() {
        return Err(ConvertError::NoFrames("no usable images".to_string()));
    }

    Ok(frames)
}
