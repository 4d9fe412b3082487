//! Frame interval parsing from archive file names.

use std::sync::LazyLock;

use regex::Regex;

/// Frame duration used when the file name carries no `@<N>ms` tag.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 40;

static INTERVAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\d+)ms").expect("interval pattern is valid"));

/// Extract the per-frame duration in milliseconds from a file name.
///
/// The first `@<digits>ms` tag wins, so `clip@100ms.zip` yields 100.
/// Names without a tag, and tags that are zero or overflow `u32`, fall back to
/// [`DEFAULT_FRAME_DURATION_MS`].
pub fn frame_duration_ms(file_name: &str) -> u32 {
    INTERVAL_TAG
        .captures(file_name)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_FRAME_DURATION_MS)
}
