use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use flate2::CrcWriter;
use flate2::read::DeflateDecoder;
use tokio::fs;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Read an entry's stored bytes, still compressed.
    ///
    /// The length is bounded by the archive size, checked in
    /// [`ZipParser::get_data_offset`].
    async fn read_raw(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("Encrypted entry {} is not supported", entry.file_name);
        }
        if let CompressionMethod::Unknown(method) = entry.compression_method {
            bail!(
                "Unsupported compression method {} for {} (only STORED and DEFLATE are supported)",
                method,
                entry.file_name
            );
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await?;
        Ok(raw)
    }

    /// Extract file to disk
    ///
    /// Decompression and the CRC check run on the blocking pool, streaming
    /// into the file.
    pub async fn extract_to_file(&self, entry: &ZipFileEntry, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let raw = self.read_raw(entry).await?;
        let entry = entry.clone();
        let output_path = output_path.to_path_buf();

        tokio::task::spawn_blocking(move || write_entry(&raw, &entry, &output_path)).await?
    }

    /// Extract every entry of the archive below `dest`.
    ///
    /// Entry names are sanitized first, so nothing is written outside `dest`.
    /// Returns the number of files written.
    pub async fn extract_all(&self, dest: &Path) -> Result<usize> {
        let entries = self.list_files().await?;
        let mut written = 0;

        for entry in &entries {
            let Some(relative) = entry.sanitized_path() else {
                tracing::debug!(name = %entry.file_name, "skipping entry with empty path");
                continue;
            };
            let target = dest.join(relative);

            if entry.is_directory {
                fs::create_dir_all(&target).await?;
                continue;
            }

            self.extract_to_file(entry, &target).await?;
            written += 1;
        }

        Ok(written)
    }
}

/// Decode `raw` into `output_path`, verifying length and CRC-32.
///
/// The decoder is capped one byte past the declared size, so an entry that
/// inflates beyond what the central directory claims stops there instead of
/// filling the disk or memory.
fn write_entry(raw: &[u8], entry: &ZipFileEntry, output_path: &Path) -> Result<()> {
    let declared = entry.uncompressed_size;
    let source: Box<dyn Read + '_> = match entry.compression_method {
        CompressionMethod::Deflate => Box::new(DeflateDecoder::new(raw)),
        _ => Box::new(raw),
    };

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut sink = CrcWriter::new(BufWriter::new(file));

    let copied = io::copy(&mut source.take(declared.saturating_add(1)), &mut sink)
        .with_context(|| format!("Failed to decompress {}", entry.file_name))?;

    if copied > declared {
        bail!(
            "Entry {} inflates past its declared size of {} bytes",
            entry.file_name,
            declared
        );
    }
    if copied != declared {
        bail!(
            "Size mismatch for {}: expected {} bytes, got {}",
            entry.file_name,
            declared,
            copied
        );
    }

    let crc = sink.crc().sum();
    if crc != entry.crc32 {
        bail!(
            "CRC mismatch for {}: expected {:08x}, got {:08x}",
            entry.file_name,
            entry.crc32,
            crc
        );
    }

    sink.into_inner().flush()?;
    Ok(())
}
