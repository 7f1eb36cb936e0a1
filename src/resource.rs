//! Storage backends for the hosts file.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::platform;

/// A byte stream the engine can rewrite in place.
///
/// Opened at the start of the existing content, never truncated on open;
/// the engine re-reads the current bytes through this handle for conflict
/// detection before overwriting them, and truncates explicitly once the
/// rewrite is complete.
pub trait ResourceHandle: Read + Write + Seek {
    /// Cuts the stream down to `size` bytes.
    fn truncate(&mut self, size: u64) -> io::Result<()>;
}

/// Backing storage for a hosts file.
///
/// Handles hold whatever lock the backend needs for the duration of one
/// engine operation and release it on drop. A contended lock must surface
/// as a `WouldBlock`-style I/O error so the retry policy can wait it out.
pub trait Resource {
    /// Opens the stored content for reading, positioned at the start.
    fn open_read(&self) -> Result<Box<dyn Read>>;

    /// Opens the stored content for rewriting, positioned at the start.
    fn open_write(&self) -> Result<Box<dyn ResourceHandle>>;
}

/// A hosts file on disk. The path may contain `%VAR%` environment
/// references, expanded once at construction.
///
/// Reads take a shared advisory lock, writes an exclusive one, both
/// non-blocking; waiting is the retry policy's job.
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(platform::expand_env(path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn open_read(&self) -> Result<Box<dyn Read>> {
        let file = File::open(&self.path)?;
        fs2::FileExt::try_lock_shared(&file)?;
        Ok(Box::new(file))
    }

    fn open_write(&self) -> Result<Box<dyn ResourceHandle>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        fs2::FileExt::try_lock_exclusive(&file)?;
        Ok(Box::new(file))
    }
}

impl ResourceHandle for File {
    fn truncate(&mut self, size: u64) -> io::Result<()> {
        self.set_len(size)
    }
}

/// An in-memory hosts file.
///
/// Clones share one buffer, so two engines constructed over clones of the
/// same resource see each other's writes. Useful in tests and for editing
/// hosts content that never touches disk.
#[derive(Clone, Default)]
pub struct MemoryResource {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryResource {
    /// An empty in-memory hosts file.
    pub fn new() -> Self {
        Self::default()
    }

    /// An in-memory hosts file seeded with `content`.
    pub fn with_content(content: &str) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(content.as_bytes().to_vec())),
        }
    }

    /// The current content as text.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("hosts buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Resource for MemoryResource {
    fn open_read(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(MemoryHandle {
            buffer: Arc::clone(&self.buffer),
            offset: 0,
        }))
    }

    fn open_write(&self) -> Result<Box<dyn ResourceHandle>> {
        Ok(Box::new(MemoryHandle {
            buffer: Arc::clone(&self.buffer),
            offset: 0,
        }))
    }
}

struct MemoryHandle {
    buffer: Arc<Mutex<Vec<u8>>>,
    offset: u64,
}

impl Read for MemoryHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.buffer.lock().expect("hosts buffer poisoned");
        let start = usize::min(self.offset as usize, data.len());
        let count = usize::min(buf.len(), data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        self.offset += count as u64;
        Ok(count)
    }
}

impl Write for MemoryHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.buffer.lock().expect("hosts buffer poisoned");
        let start = self.offset as usize;
        if data.len() < start {
            data.resize(start, 0);
        }
        let overlap = usize::min(buf.len(), data.len() - start);
        data[start..start + overlap].copy_from_slice(&buf[..overlap]);
        data.extend_from_slice(&buf[overlap..]);
        self.offset += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.buffer.lock().expect("hosts buffer poisoned").len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(delta) => len + delta,
            SeekFrom::Current(delta) => self.offset as i64 + delta,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of buffer",
            ));
        }
        self.offset = target as u64;
        Ok(self.offset)
    }
}

impl ResourceHandle for MemoryHandle {
    fn truncate(&mut self, size: u64) -> io::Result<()> {
        let mut data = self.buffer.lock().expect("hosts buffer poisoned");
        data.truncate(size as usize);
        Ok(())
    }
}
