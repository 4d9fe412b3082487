//! Animated GIF encoding.
//!
//! Frames are quantized one by one with the `gif` crate's built-in quantizer
//! and written with restore-to-background disposal, so every frame fully
//! replaces the previous one.
//!
//! # Example
//!
//! ```no_run
//! use image::{DynamicImage, RgbImage};
//! use zip2gif::{GifOptions, encode_gif};
//!
//! let frames = vec![
//!     DynamicImage::ImageRgb8(RgbImage::new(32, 32)),
//!     DynamicImage::ImageRgb8(RgbImage::new(32, 32)),
//! ];
//! encode_gif("out.gif", &frames, &GifOptions::new().frame_duration_ms(100))?;
//! # Ok::<(), zip2gif::ConvertError>(())
//! ```

use std::io::{BufWriter, Write};
use std::path::Path;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::DynamicImage;

use crate::error::ConvertError;
use crate::interval::DEFAULT_FRAME_DURATION_MS;

/// Configuration for animated GIF output.
#[derive(Debug, Clone)]
pub struct GifOptions {
    /// Display time of each frame in milliseconds.
    pub frame_duration_ms: u32,
    /// How many times the GIF should repeat. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Quantizer speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            repeat: None,
            speed: 10,
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display time of each frame in milliseconds.
    pub fn frame_duration_ms(mut self, ms: u32) -> Self {
        self.frame_duration_ms = ms;
        self
    }

    /// Set the repeat count. `None` means loop forever.
    pub fn repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// GIF frame delay in hundredths of a second, rounded to nearest.
    pub fn frame_delay(&self) -> u16 {
        let centis = (u64::from(self.frame_duration_ms) + 5) / 10;
        centis.min(u64::from(u16::MAX)) as u16
    }
}

/// Encode `frames` as an animated GIF at `path`.
///
/// The first frame fixes the canvas size; any frame of a different size is an
/// error. The file is written next to `path` under a temporary name and only
/// renamed into place once complete, so a failure leaves nothing behind.
pub fn encode_gif<P: AsRef<Path>>(
    path: P,
    frames: &[DynamicImage],
    options: &GifOptions,
) -> Result<(), ConvertError> {
    let path = path.as_ref();
    let encode_err = |reason: String| ConvertError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    tracing::debug!(
        "Encoding {} frames to GIF file {:?} (delay={}cs)",
        frames.len(),
        path,
        options.frame_delay(),
    );

    let Some(first) = frames.first() else {
        return Err(encode_err("no frames to encode".to_string()));
    };
    let (width, height) = (first.width(), first.height());
    let (Ok(gif_width), Ok(gif_height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(encode_err(format!(
            "{width}x{height} exceeds the GIF size limit of 65535x65535"
        )));
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".zip2gif-").suffix(".gif.part");
    // Same mode as a plain File::create: 0o666 filtered through the umask
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let staging = builder.tempfile_in(dir)?;

    let mut encoder = Encoder::new(BufWriter::new(staging.as_file()), gif_width, gif_height, &[])
        .map_err(|e| encode_err(format!("Failed to create GIF encoder: {e}")))?;

    let repeat = match options.repeat {
        None => Repeat::Infinite,
        Some(n) => Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| encode_err(format!("Failed to set GIF repeat: {e}")))?;

    let delay = options.frame_delay();
    let speed = options.speed.clamp(1, 30);
    for (index, image) in frames.iter().enumerate() {
        if image.width() != width || image.height() != height {
            return Err(encode_err(format!(
                "frame {} is {}x{}, expected {}x{}",
                index + 1,
                image.width(),
                image.height(),
                width,
                height
            )));
        }

        let mut pixels = image.to_rgba8().into_raw();
        let mut gif_frame = Frame::from_rgba_speed(gif_width, gif_height, &mut pixels, speed);
        gif_frame.delay = delay;
        gif_frame.dispose = DisposalMethod::Background;

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| encode_err(format!("Failed to write GIF frame {}: {e}", index + 1)))?;
    }

    let mut writer = encoder
        .into_inner()
        .map_err(|e| encode_err(format!("Failed to finish GIF: {e}")))?;
    writer
        .flush()
        .map_err(|e| encode_err(format!("Failed to flush GIF: {e}")))?;
    drop(writer);

    staging
        .persist(path)
        .map_err(|e| encode_err(format!("Failed to move GIF into place: {}", e.error)))?;

    Ok(())
}
