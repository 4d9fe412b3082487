//! Low-level ZIP archive parser.
//!
//! Archives are read back to front: the End of Central Directory record
//! (optionally followed by a comment) points at the Central Directory, which
//! describes every entry; each entry's Local File Header then locates its data.
//! Only the tail and the Central Directory are read to list an archive.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Result, bail};

use super::structures::*;

/// Largest comment the format allows after the EOCD record.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Extra field tag for ZIP64 extended information.
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Offset of the file name length inside a Local File Header.
const LFH_NAME_LEN_OFFSET: u64 = 26;

/// Low-level ZIP parser over any [`ReadAt`] source.
///
/// Usually driven through [`ZipExtractor`](super::ZipExtractor).
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Locate the End of Central Directory record.
    ///
    /// Returns the record and its offset. The comment-less layout is tried
    /// first; otherwise the last 64 KiB are scanned backwards for a signature
    /// whose comment length matches the bytes that follow it.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let eocd_size = EndOfCentralDirectory::SIZE as u64;

        if self.size >= eocd_size {
            let offset = self.size - eocd_size;
            let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
            self.reader.read_exact_at(offset, &mut buf).await?;

            if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && buf[20..22] == [0, 0] {
                return Ok((EndOfCentralDirectory::from_bytes(&buf)?, offset));
            }
        }

        let window = (MAX_COMMENT_SIZE + eocd_size).min(self.size);
        let window_start = self.size - window;
        let mut buf = vec![0u8; window as usize];
        self.reader.read_exact_at(window_start, &mut buf).await?;

        let last = buf.len().saturating_sub(EndOfCentralDirectory::SIZE);
        for i in (0..last).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
                return Ok((eocd, window_start + i as u64));
            }
        }

        bail!("Not a valid ZIP file")
    }

    /// Read the ZIP64 EOCD through the locator that precedes the regular EOCD.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let Some(locator_offset) = eocd_offset.checked_sub(Zip64EOCDLocator::SIZE as u64) else {
            bail!("Invalid ZIP64 format");
        };
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;
        if locator.is_multi_disk() {
            bail!("Multi-disk archives are not supported");
        }

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;

        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List every entry (files and directories) in Central Directory order.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            if eocd64.is_multi_disk() {
                bail!("Multi-disk archives are not supported");
            }
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            if eocd.is_multi_disk() {
                bail!("Multi-disk archives are not supported");
            }
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.checked_add(cd_size).is_none_or(|end| end > eocd_offset) {
            bail!("Central Directory lies outside the archive (truncated file?)");
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        // A bogus entry count must not drive the allocation
        let capacity = total_entries.min(cd_size / CDFH_MIN_SIZE as u64) as usize;
        let mut entries = Vec::with_capacity(capacity);
        let mut cursor = Cursor::new(cd_data.as_slice());

        for _ in 0..total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Offset of an entry's data, past its Local File Header.
    ///
    /// The local name and extra field lengths can differ from the Central
    /// Directory copy, so the header is read rather than trusted.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header for {}", entry.file_name);
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(LFH_NAME_LEN_OFFSET);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        let data_offset =
            entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length;

        if data_offset.saturating_add(entry.compressed_size) > self.size {
            bail!("Entry {} extends past the end of the archive", entry.file_name);
        }

        Ok(data_offset)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}

/// Parse one Central Directory File Header at the cursor position.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        bail!("Invalid Central Directory File Header");
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    // Non-UTF-8 names are kept lossily; they only become scratch file names
    let file_name = String::from_utf8_lossy(&file_name_bytes).into_owned();
    let is_directory = file_name.ends_with('/');

    let mut extra = vec![0u8; extra_field_length as usize];
    cursor.read_exact(&mut extra)?;
    let mut sizes = Zip64Sizes {
        compressed_size,
        uncompressed_size,
        lfh_offset,
    };
    apply_zip64_extra(&extra, &mut sizes)?;

    cursor.set_position(cursor.position() + file_comment_length as u64);

    Ok(ZipFileEntry {
        file_name,
        flags,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size: sizes.compressed_size,
        uncompressed_size: sizes.uncompressed_size,
        crc32,
        lfh_offset: sizes.lfh_offset,
        is_directory,
    })
}

/// Header fields that ZIP64 can widen.
struct Zip64Sizes {
    compressed_size: u64,
    uncompressed_size: u64,
    lfh_offset: u64,
}

/// Replace saturated 32-bit fields with their ZIP64 extra field values.
///
/// The ZIP64 record only holds the fields whose header value is 0xFFFFFFFF,
/// in the order uncompressed size, compressed size, header offset.
fn apply_zip64_extra(extra: &[u8], sizes: &mut Zip64Sizes) -> Result<()> {
    const SATURATED: u64 = 0xFFFF_FFFF;
    let mut cursor = Cursor::new(extra);

    while cursor.position() + 4 <= extra.len() as u64 {
        let header_id = cursor.read_u16::<LittleEndian>()?;
        let field_size = cursor.read_u16::<LittleEndian>()? as u64;
        let field_end = (cursor.position() + field_size).min(extra.len() as u64);

        if header_id == ZIP64_EXTRA_ID {
            for value in [
                &mut sizes.uncompressed_size,
                &mut sizes.compressed_size,
                &mut sizes.lfh_offset,
            ] {
                if *value == SATURATED && cursor.position() + 8 <= field_end {
                    *value = cursor.read_u64::<LittleEndian>()?;
                }
            }
        }

        cursor.set_position(field_end);
    }

    Ok(())
}
