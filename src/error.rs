//! Engine error taxonomy.
//!
//! Every failure crossing the layout/indexing boundary is represented as
//! an explicit [`EngineError`] value; the engine never panics and never
//! unwinds across that boundary.

use std::io;
use std::path::Path;

/// Pagination engine error.
#[derive(Debug)]
pub enum EngineError {
    /// The document (or a sidecar file) could not be opened or read.
    ///
    /// Terminal for the current session; callers typically fall back to
    /// a file picker rather than retrying.
    FileUnavailable {
        /// Path that failed to open or read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The persisted chunk index is malformed or incomplete.
    ///
    /// Recovered automatically by discarding and rebuilding the index.
    IndexCorrupt {
        /// Human-readable reason, including the offending record if known.
        reason: String,
    },
    /// A chunk's layout would overflow a bounded session pool.
    ///
    /// Recoverable per chunk load; the session is left reset.
    CapacityExceeded {
        /// Which pool overflowed.
        kind: &'static str,
        /// Attempted size.
        actual: usize,
        /// Configured capacity.
        limit: usize,
    },
    /// A persisted bookmark references a chunk outside the document.
    ///
    /// Recovered by leaving pagination at its defaults (chunk 0, page 0).
    BookmarkInvalid {
        /// Chunk index the bookmark referenced.
        chunk_index: usize,
        /// Number of chunks in the document.
        chunk_count: usize,
    },
}

impl EngineError {
    pub(crate) fn file(path: &Path, source: io::Error) -> Self {
        Self::FileUnavailable {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::IndexCorrupt {
            reason: reason.into(),
        }
    }

    pub(crate) fn capacity(kind: &'static str, actual: usize, limit: usize) -> Self {
        Self::CapacityExceeded {
            kind,
            actual,
            limit,
        }
    }
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FileUnavailable { path, source } => {
                write!(f, "file unavailable: {}: {}", path, source)
            }
            Self::IndexCorrupt { reason } => write!(f, "chunk index corrupt: {}", reason),
            Self::CapacityExceeded {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "layout capacity exceeded: {} (actual={} limit={})",
                kind, actual, limit
            ),
            Self::BookmarkInvalid {
                chunk_index,
                chunk_count,
            } => write!(
                f,
                "bookmark references chunk {} of {}",
                chunk_index, chunk_count
            ),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}
