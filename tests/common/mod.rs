//! Shared fixtures: in-memory ZIP archives and JPEG frames.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Crc;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Minimal ZIP writer covering what the extractor reads.
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<Entry>,
}

struct Entry {
    name: String,
    data: Vec<u8>,
    method: u16,
    flags: u16,
    crc_override: Option<u32>,
    size_override: Option<u32>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an uncompressed entry.
    pub fn stored(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(Entry {
            name: name.to_string(),
            data: data.to_vec(),
            method: 0,
            flags: 0,
            crc_override: None,
            size_override: None,
        });
        self
    }

    /// Add a DEFLATE-compressed entry.
    pub fn deflated(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(Entry {
            name: name.to_string(),
            data: data.to_vec(),
            method: 8,
            flags: 0,
            crc_override: None,
            size_override: None,
        });
        self
    }

    /// Add a directory entry.
    pub fn directory(self, name: &str) -> Self {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{name}/")
        };
        self.stored(&name, b"")
    }

    /// Add an uncompressed entry whose recorded CRC is wrong.
    pub fn stored_with_bad_crc(mut self, name: &str, data: &[u8]) -> Self {
        self = self.stored(name, data);
        if let Some(last) = self.entries.last_mut() {
            last.crc_override = Some(crc32(data) ^ 0xDEAD_BEEF);
        }
        self
    }

    /// Add an entry flagged as encrypted.
    pub fn encrypted(mut self, name: &str, data: &[u8]) -> Self {
        self = self.stored(name, data);
        if let Some(last) = self.entries.last_mut() {
            last.flags = 0x0001;
        }
        self
    }

    /// Add a DEFLATE entry whose headers claim `declared` uncompressed bytes.
    pub fn deflated_with_declared_size(mut self, name: &str, data: &[u8], declared: u32) -> Self {
        self = self.deflated(name, data);
        if let Some(last) = self.entries.last_mut() {
            last.size_override = Some(declared);
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let payload = match entry.method {
                8 => {
                    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&entry.data).unwrap();
                    encoder.finish().unwrap()
                }
                _ => entry.data.clone(),
            };
            let crc = entry.crc_override.unwrap_or_else(|| crc32(&entry.data));
            let offset = out.len() as u32;
            let size = entry.size_override.unwrap_or(entry.data.len() as u32);

            // Local file header
            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(entry.flags).unwrap();
            out.write_u16::<LittleEndian>(entry.method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0x21).unwrap();
            out.write_u32::<LittleEndian>(crc).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(size).unwrap();
            out.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(entry.name.as_bytes()).unwrap();
            out.write_all(&payload).unwrap();

            // Central directory file header
            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(entry.flags).unwrap();
            central.write_u16::<LittleEndian>(entry.method).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0x21).unwrap();
            central.write_u32::<LittleEndian>(crc).unwrap();
            central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            central.write_u32::<LittleEndian>(size).unwrap();
            central.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(offset).unwrap();
            central.write_all(entry.name.as_bytes()).unwrap();
        }

        let cd_offset = out.len() as u32;
        out.extend_from_slice(&central);

        // End of central directory
        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();

        out
    }

    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

/// A solid-color JPEG.
pub fn jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Jpeg).unwrap();
    bytes.into_inner()
}

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

/// Decoded GIF: repeat setting and (delay, dispose, first-pixel RGBA) per frame.
pub struct GifSummary {
    pub repeat: gif::Repeat,
    pub width: u16,
    pub height: u16,
    pub frames: Vec<(u16, gif::DisposalMethod, [u8; 4])>,
}

pub fn read_gif(path: &Path) -> GifSummary {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(std::fs::File::open(path).unwrap())
        .unwrap();

    let (width, height) = (decoder.width(), decoder.height());
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        let px = [frame.buffer[0], frame.buffer[1], frame.buffer[2], frame.buffer[3]];
        frames.push((frame.delay, frame.dispose, px));
    }

    GifSummary {
        repeat: decoder.repeat(),
        width,
        height,
        frames,
    }
}

/// Which of red, green or blue dominates a pixel.
pub fn dominant(px: [u8; 4]) -> [u8; 3] {
    let [r, g, b, _] = px;
    if r > g && r > b {
        RED
    } else if g > r && g > b {
        GREEN
    } else {
        BLUE
    }
}
