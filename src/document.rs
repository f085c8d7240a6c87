//! Byte-stream access to the source document.
//!
//! The document file is reopened per operation and never held across
//! engine calls. Lines are read through a fixed-capacity buffer: bytes
//! past [`MAX_LINE_BYTES`] are discarded up to the newline, matching
//! the bounded line reads of the target hardware.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Maximum bytes kept per raw source line.
pub const MAX_LINE_BYTES: usize = 1024;

/// A markdown document on disk.
#[derive(Clone, Debug)]
pub struct Document {
    path: PathBuf,
}

impl Document {
    /// Open a document, verifying the file is readable.
    ///
    /// The handle is not retained; each read operation reopens the file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let path = path.into();
        File::open(&path).map_err(|e| EngineError::file(&path, e))?;
        Ok(Self { path })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a line reader positioned at `offset` bytes.
    pub fn reader_at(&self, offset: u64) -> Result<LineReader, EngineError> {
        let mut file = File::open(&self.path).map_err(|e| EngineError::file(&self.path, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| EngineError::file(&self.path, e))?;
        Ok(LineReader {
            inner: BufReader::new(file),
            buf: heapless::Vec::new(),
            next_offset: offset,
            path: self.path.clone(),
        })
    }
}

/// Sequential line reader with a bounded per-line buffer.
pub struct LineReader {
    inner: BufReader<File>,
    buf: heapless::Vec<u8, MAX_LINE_BYTES>,
    next_offset: u64,
    path: PathBuf,
}

impl LineReader {
    /// Byte offset of the next unread line.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Read the next line, trimmed and with any trailing carriage
    /// return removed. Returns `Ok(None)` at end of stream.
    ///
    /// Lines longer than [`MAX_LINE_BYTES`] are truncated; invalid
    /// UTF-8 is cut at the first bad byte.
    pub fn next_line(&mut self) -> Result<Option<&str>, EngineError> {
        self.buf.clear();
        let mut read_any = false;
        loop {
            let chunk = self
                .inner
                .fill_buf()
                .map_err(|e| EngineError::file(&self.path, e))?;
            if chunk.is_empty() {
                if !read_any {
                    return Ok(None);
                }
                break;
            }
            let newline = chunk.iter().position(|&b| b == b'\n');
            let line_bytes = newline.unwrap_or(chunk.len());
            let room = MAX_LINE_BYTES - self.buf.len();
            let _ = self.buf.extend_from_slice(&chunk[..line_bytes.min(room)]);
            let consumed = match newline {
                Some(i) => i + 1,
                None => chunk.len(),
            };
            self.inner.consume(consumed);
            self.next_offset += consumed as u64;
            read_any = true;
            if newline.is_some() {
                break;
            }
        }
        Ok(Some(trim_raw_line(&self.buf)))
    }
}

/// Valid-UTF-8 prefix with the trailing `\r` and surrounding
/// whitespace removed.
fn trim_raw_line(bytes: &[u8]) -> &str {
    let text = match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let valid = e.valid_up_to();
            core::str::from_utf8(&bytes[..valid]).unwrap_or("")
        }
    };
    let text = text.strip_suffix('\r').unwrap_or(text);
    text.trim()
}
