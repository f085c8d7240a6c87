//! Shared fixtures for the integration tests.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use md_stream::{FontVariant, TextMeasurer};

/// Deterministic measurer: every character advances 10px; headings are
/// taller than body text.
pub struct FixedAdvance;

impl TextMeasurer for FixedAdvance {
    fn measure_px(&self, text: &str, font: FontVariant) -> (u32, u32) {
        let height = match font {
            FontVariant::Heading1 => 28,
            FontVariant::Heading2 => 24,
            FontVariant::Heading3 => 20,
            _ => 16,
        };
        (text.chars().count() as u32 * 10, height)
    }
}

pub fn measurer() -> Arc<dyn TextMeasurer> {
    Arc::new(FixedAdvance)
}

/// Write a document into a fresh temp dir, returning the dir and path.
pub fn write_doc(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("book.md");
    let mut f = File::create(&path).expect("create doc");
    f.write_all(contents.as_bytes()).expect("write doc");
    (dir, path)
}
