//! Chunk index: offsets, headings, and pre-computed page counts.
//!
//! Built in a single forward pass over the document, optionally
//! completed by a page-count pass, and persisted as one text record per
//! chunk. A persisted index either carries a page count for every
//! chunk or is discarded and rebuilt; no mixed state is ever loaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{LineClassifier, LineStyle};
use crate::document::Document;
use crate::error::EngineError;

/// Field delimiter of the index and bookmark files.
pub const RECORD_DELIMITER: char = '|';

/// Extension appended to the document path for the index sidecar.
const INDEX_EXT: &str = "idx";

/// One chunk of the document: a fixed-size span of source lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Byte offset of the chunk's first line in the source file.
    pub offset: u64,
    /// Content of the first `# ` heading since the chunk started;
    /// empty when the chunk has none.
    pub heading: String,
    /// Pages this chunk paginates into; `None` until the page-count
    /// pass has run.
    pub page_count: Option<u32>,
}

/// Ordered chunk table for one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkIndex {
    chunks: Vec<ChunkInfo>,
}

impl ChunkIndex {
    /// Build an index from pre-computed chunk records.
    pub fn from_chunks(chunks: Vec<ChunkInfo>) -> Self {
        Self { chunks }
    }

    /// Scan the document once, recording a chunk every `chunk_lines`
    /// lines. Page counts are left unset.
    ///
    /// Chunk 0 always exists and always starts at offset 0, even for an
    /// empty document.
    pub fn scan(doc: &Document, chunk_lines: usize) -> Result<Self, EngineError> {
        let chunk_lines = chunk_lines.max(1);
        let mut reader = doc.reader_at(0)?;
        let mut classifier = LineClassifier::new();

        let mut chunks = Vec::new();
        let mut start_offset = 0u64;
        let mut heading: Option<String> = None;
        let mut lines_in_chunk = 0usize;

        loop {
            let offset = reader.next_offset();
            let Some(raw) = reader.next_line()? else {
                break;
            };
            if lines_in_chunk == 0 {
                start_offset = offset;
            }
            let classified = classifier.classify(raw);
            if classified.style == LineStyle::Heading1 && heading.is_none() {
                heading = Some(classified.content.to_string());
            }
            lines_in_chunk += 1;
            if lines_in_chunk == chunk_lines {
                chunks.push(ChunkInfo {
                    offset: start_offset,
                    heading: heading.take().unwrap_or_default(),
                    page_count: None,
                });
                lines_in_chunk = 0;
            }
        }

        if lines_in_chunk > 0 || chunks.is_empty() {
            chunks.push(ChunkInfo {
                offset: start_offset,
                heading: heading.unwrap_or_default(),
                page_count: None,
            });
        }

        log::debug!("scanned {}: {} chunks", doc.path().display(), chunks.len());
        Ok(Self { chunks })
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when the index holds no chunks (never after a scan).
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk record by index.
    pub fn get(&self, chunk: usize) -> Option<&ChunkInfo> {
        self.chunks.get(chunk)
    }

    /// All chunk records in document order.
    pub fn chunks(&self) -> &[ChunkInfo] {
        &self.chunks
    }

    pub(crate) fn set_page_count(&mut self, chunk: usize, pages: u32) {
        if let Some(info) = self.chunks.get_mut(chunk) {
            info.page_count = Some(pages);
        }
    }

    /// True when every chunk has a page count.
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(|c| c.page_count.is_some())
    }

    /// Sum of all chunks' page counts; the document's total pages.
    pub fn total_pages(&self) -> u32 {
        self.chunks
            .iter()
            .map(|c| c.page_count.unwrap_or(0))
            .sum()
    }

    /// Pages contributed by chunks preceding `chunk`.
    pub fn pages_before(&self, chunk: usize) -> u32 {
        self.chunks
            .iter()
            .take(chunk)
            .map(|c| c.page_count.unwrap_or(0))
            .sum()
    }

    /// Persist all records to `path`, creating parent directories.
    ///
    /// The file is written in one operation; no handle is held
    /// afterwards.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::file(path, e))?;
            }
        }
        let mut out = String::new();
        for info in &self.chunks {
            out.push_str(&info.offset.to_string());
            out.push(RECORD_DELIMITER);
            out.push_str(&info.heading);
            if let Some(pages) = info.page_count {
                out.push(RECORD_DELIMITER);
                out.push_str(&pages.to_string());
            }
            out.push('\n');
        }
        fs::write(path, out).map_err(|e| EngineError::file(path, e))
    }

    /// Load a persisted index.
    ///
    /// Returns [`EngineError::IndexCorrupt`] for malformed records and
    /// for records lacking a page count: a partially counted index is
    /// discarded as a whole and rebuilt by the caller.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|e| EngineError::file(path, e))?;
        let mut chunks = Vec::new();
        let mut prev_offset = 0u64;
        for (n, record) in contents.lines().enumerate() {
            let first = record
                .find(RECORD_DELIMITER)
                .ok_or_else(|| EngineError::corrupt(format!("record {}: no delimiter", n)))?;
            let last = record.rfind(RECORD_DELIMITER).unwrap_or(first);
            if last == first {
                return Err(EngineError::corrupt(format!(
                    "record {}: page count missing",
                    n
                )));
            }
            let offset: u64 = record[..first]
                .parse()
                .map_err(|_| EngineError::corrupt(format!("record {}: bad offset", n)))?;
            let pages: u32 = record[last + 1..]
                .parse()
                .map_err(|_| EngineError::corrupt(format!("record {}: bad page count", n)))?;
            if n == 0 && offset != 0 {
                return Err(EngineError::corrupt("chunk 0 must start at offset 0"));
            }
            if n > 0 && offset < prev_offset {
                return Err(EngineError::corrupt(format!(
                    "record {}: offsets not ascending",
                    n
                )));
            }
            prev_offset = offset;
            chunks.push(ChunkInfo {
                offset,
                heading: record[first + 1..last].to_string(),
                page_count: Some(pages),
            });
        }
        if chunks.is_empty() {
            return Err(EngineError::corrupt("index holds no chunks"));
        }
        Ok(Self { chunks })
    }
}

/// Sidecar index path for a document: `<path>.idx`.
pub fn index_path_for(doc_path: &Path) -> PathBuf {
    sidecar_path(doc_path, INDEX_EXT)
}

pub(crate) fn sidecar_path(doc_path: &Path, ext: &str) -> PathBuf {
    let mut name = doc_path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn temp_doc(contents: &str) -> (tempfile::TempDir, Document) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, Document::open(path).unwrap())
    }

    #[test]
    fn scan_splits_on_chunk_boundaries() {
        let (_dir, doc) = temp_doc("a\nb\nc\nd\ne\n");
        let index = ChunkIndex::scan(&doc, 2).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(0).unwrap().offset, 0);
        assert_eq!(index.get(1).unwrap().offset, 4);
        assert_eq!(index.get(2).unwrap().offset, 8);
    }

    #[test]
    fn scan_records_first_heading_per_chunk() {
        let (_dir, doc) = temp_doc("# One\nx\n# Two\ny\nz\n# Three\n");
        let index = ChunkIndex::scan(&doc, 3).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap().heading, "One");
        assert_eq!(index.get(1).unwrap().heading, "Three");
    }

    #[test]
    fn chunk_without_heading_is_empty() {
        let (_dir, doc) = temp_doc("plain\ntext\n");
        let index = ChunkIndex::scan(&doc, 10).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0).unwrap().heading, "");
    }

    #[test]
    fn empty_document_still_gets_chunk_zero() {
        let (_dir, doc) = temp_doc("");
        let index = ChunkIndex::scan(&doc, 10).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0).unwrap().offset, 0);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sys").join("doc.idx");
        let mut index = ChunkIndex {
            chunks: vec![
                ChunkInfo {
                    offset: 0,
                    heading: "Intro".into(),
                    page_count: None,
                },
                ChunkInfo {
                    offset: 512,
                    heading: String::new(),
                    page_count: None,
                },
            ],
        };
        index.set_page_count(0, 3);
        index.set_page_count(1, 7);
        index.save(&path).unwrap();
        let loaded = ChunkIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
        assert_eq!(loaded.total_pages(), 10);
        assert_eq!(loaded.pages_before(1), 3);
    }

    #[test]
    fn heading_may_contain_the_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.idx");
        let mut index = ChunkIndex {
            chunks: vec![ChunkInfo {
                offset: 0,
                heading: "Odds | Ends".into(),
                page_count: None,
            }],
        };
        index.set_page_count(0, 1);
        index.save(&path).unwrap();
        let loaded = ChunkIndex::load(&path).unwrap();
        assert_eq!(loaded.get(0).unwrap().heading, "Odds | Ends");
    }

    #[test]
    fn missing_page_count_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.idx");
        fs::write(&path, "0|Intro|2\n512|Later\n").unwrap();
        let err = ChunkIndex::load(&path).unwrap_err();
        assert!(matches!(err, EngineError::IndexCorrupt { .. }));
    }

    #[test]
    fn malformed_records_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.idx");
        for bad in ["garbage\n", "x|h|1\n", "0|h|x\n", "5|h|1\n", ""] {
            fs::write(&path, bad).unwrap();
            let err = ChunkIndex::load(&path).unwrap_err();
            assert!(
                matches!(err, EngineError::IndexCorrupt { .. }),
                "expected corrupt for {:?}",
                bad
            );
        }
    }

    #[test]
    fn scan_is_deterministic() {
        let (_dir, doc) = temp_doc("# A\none two three\n\n- x\n- y\nmore\n");
        let a = ChunkIndex::scan(&doc, 2).unwrap();
        let b = ChunkIndex::scan(&doc, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sidecar_path_appends_extension() {
        assert_eq!(
            index_path_for(Path::new("/books/story.md")),
            PathBuf::from("/books/story.md.idx")
        );
    }
}
