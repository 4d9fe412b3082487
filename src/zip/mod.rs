//! ZIP archive parsing and extraction.
//!
//! The frame archives are plain ZIP files, read here with random access
//! through [`ReadAt`](crate::io::ReadAt).
//!
//! ## Architecture
//!
//! - [`structures`]: ZIP format records (EOCD, ZIP64 records, entries)
//! - [`parser`]: Low-level parsing of those records from raw bytes
//! - [`extractor`]: Entry decompression and extraction to disk
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is read first, then the Central Directory, then each entry's data.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE compression methods, with CRC-32 verification
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod extractor;
mod parser;
mod structures;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::io::LocalFileReader;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;

/// Extract the ZIP archive at `archive` into `dest`.
///
/// Returns the number of files written.
pub async fn extract_archive(archive: &Path, dest: &Path) -> Result<usize> {
    let reader = Arc::new(LocalFileReader::new(archive)?);
    ZipExtractor::new(reader).extract_all(dest).await
}
