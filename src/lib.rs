//! Memory-efficient markdown pagination for embedded e-readers.
//!
//! `md-stream` lays out large markdown documents on devices that cannot
//! hold or reflow the whole document in memory. The document is split
//! into fixed-size line chunks, indexed once with pre-computed page
//! counts, and paginated one chunk at a time through bounded pools; a
//! persistent bookmark resumes the exact reading position across
//! restarts.
//!
//! The crate consumes a [`TextMeasurer`] capability from the display
//! backend and produces ordered, renderable page windows; it issues no
//! drawing calls and owns no framebuffer.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use md_stream::{
//!     BookmarkStore, EngineOptions, FontVariant, PageEngine, TextMeasurer,
//! };
//!
//! struct MyFontMetrics;
//!
//! impl TextMeasurer for MyFontMetrics {
//!     fn measure_px(&self, text: &str, _font: FontVariant) -> (u32, u32) {
//!         (text.len() as u32 * 7, 14)
//!     }
//! }
//!
//! # fn example() -> Result<(), md_stream::EngineError> {
//! let mut engine = PageEngine::open(
//!     "/books/field-notes.md",
//!     Arc::new(MyFontMetrics),
//!     EngineOptions::for_display(480),
//! )?;
//! let bookmarks = BookmarkStore::for_document("/books/field-notes.md".as_ref());
//! engine.restore_bookmark(&bookmarks)?;
//!
//! for line in engine.page_lines() {
//!     for word in line.words() {
//!         // hand word.text / word.bold / word.italic to the renderer
//!     }
//! }
//! engine.next_page()?;
//! engine.save_bookmark(&bookmarks)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod bookmark;
pub mod classify;
pub mod document;
pub mod engine;
pub mod error;
pub mod fonts;
pub mod index;
pub mod inline;
pub mod paging;
pub mod session;
pub mod wrap;

pub use bookmark::{bookmark_path_for, Bookmark, BookmarkStore};
pub use classify::{ClassifiedLine, LineClassifier, LineStyle};
pub use document::{Document, LineReader, MAX_LINE_BYTES};
pub use engine::{EngineOptions, PageEngine, PageLine, PageLines};
pub use error::EngineError;
pub use fonts::{font_for, FontVariant, TextMeasurer};
pub use index::{index_path_for, ChunkIndex, ChunkInfo, RECORD_DELIMITER};
pub use inline::{segment_runs, InlineRun, InlineRuns};
pub use paging::{
    global_page, line_window, local_max_page, locate_global_page, page_count_for_lines,
    PagePosition,
};
pub use session::{DisplayLine, LayoutSession, SessionLimits, SourceLine, Word, WordRef};
pub use wrap::{LayoutConfig, WordWrapper};
