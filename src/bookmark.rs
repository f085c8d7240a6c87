//! Persistent reading position.
//!
//! A bookmark is the only state that survives a chunk unload: the
//! chunk index plus the local page within it, one delimiter-joined
//! record in a sidecar file. The store opens, writes, and closes the
//! file per operation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::index::{sidecar_path, RECORD_DELIMITER};

/// Extension appended to the document path for the bookmark sidecar.
const BOOKMARK_EXT: &str = "bkm";

/// Persisted reading position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bookmark {
    /// Chunk the reader was in.
    pub chunk_index: usize,
    /// 0-based local page within that chunk.
    pub local_page: u32,
}

/// File-backed bookmark storage for one document.
#[derive(Clone, Debug)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    /// Store writing to an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the document's default sidecar path (`<doc>.bkm`).
    pub fn for_document(doc_path: &Path) -> Self {
        Self::new(bookmark_path_for(doc_path))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a bookmark, creating parent directories as needed.
    pub fn save(&self, bookmark: Bookmark) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::file(&self.path, e))?;
            }
        }
        let record = format!(
            "{}{}{}\n",
            bookmark.chunk_index, RECORD_DELIMITER, bookmark.local_page
        );
        fs::write(&self.path, record).map_err(|e| EngineError::file(&self.path, e))
    }

    /// Load the persisted bookmark.
    ///
    /// A missing or malformed file yields `Ok(None)`: the caller keeps
    /// its default position. Range validation against the chunk table
    /// is the engine's job, not the store's.
    pub fn load(&self) -> Result<Option<Bookmark>, EngineError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EngineError::file(&self.path, e)),
        };
        let record = contents.trim();
        let Some((chunk, page)) = record.split_once(RECORD_DELIMITER) else {
            log::warn!("bookmark {}: malformed record", self.path.display());
            return Ok(None);
        };
        match (chunk.parse(), page.parse()) {
            (Ok(chunk_index), Ok(local_page)) => Ok(Some(Bookmark {
                chunk_index,
                local_page,
            })),
            _ => {
                log::warn!("bookmark {}: unparsable fields", self.path.display());
                Ok(None)
            }
        }
    }
}

/// Sidecar bookmark path for a document: `<path>.bkm`.
pub fn bookmark_path_for(doc_path: &Path) -> PathBuf {
    sidecar_path(doc_path, BOOKMARK_EXT)
}
