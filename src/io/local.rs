use super::ReadAt;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Local file reader with random access support
///
/// Reads run on Tokio's blocking pool so a slow disk never stalls the
/// runtime threads that drive other archives.
pub struct LocalFileReader {
    file: Arc<std::fs::File>,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open archive {}", path.display()))?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Arc::new(file),
            size,
        })
    }
}

fn pread(file: &std::fs::File, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.read_at(buf, offset)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        // seek_read moves the cursor, but every caller passes an explicit offset
        file.seek_read(buf, offset)
    }

    #[cfg(not(any(unix, windows)))]
    {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = file;
        file.seek(SeekFrom::Start(offset))?;
        file.read(buf)
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= self.size || buf.is_empty() {
            return Ok(0);
        }

        let file = self.file.clone();
        let len = buf.len().min((self.size - offset) as usize);
        let chunk = tokio::task::spawn_blocking(move || {
            let mut chunk = vec![0u8; len];
            let n = pread(&file, offset, &mut chunk)?;
            chunk.truncate(n);
            Ok::<_, std::io::Error>(chunk)
        })
        .await??;

        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_at_offset_and_reports_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();

        let reader = LocalFileReader::new(file.path()).unwrap();
        assert_eq!(reader.size(), 10);

        let mut buf = [0u8; 4];
        reader.read_exact_at(3, &mut buf).await.unwrap();
        assert_eq!(&buf, b"3456");
    }

    #[tokio::test]
    async fn read_exact_past_end_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let reader = LocalFileReader::new(file.path()).unwrap();
        let mut buf = [0u8; 8];
        assert!(reader.read_exact_at(0, &mut buf).await.is_err());
    }

    #[tokio::test]
    async fn read_at_end_returns_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let reader = LocalFileReader::new(file.path()).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(reader.read_at(3, &mut buf).await.unwrap(), 0);
        assert_eq!(reader.read_at(1, &mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"bc");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reads_off_the_runtime_thread() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[9u8; 4096]).unwrap();

        // On a single-threaded runtime the read has to yield to the blocking
        // pool, so a concurrently spawned task gets to run first.
        let reader = Arc::new(LocalFileReader::new(file.path()).unwrap());
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = ran.clone();
        let other = tokio::spawn(async move {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        let mut buf = vec![0u8; 4096];
        reader.read_exact_at(0, &mut buf).await.unwrap();
        assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
        assert!(buf.iter().all(|&b| b == 9));
        other.await.unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = LocalFileReader::new(Path::new("/definitely/not/here.zip"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/definitely/not/here.zip"));
    }
}
