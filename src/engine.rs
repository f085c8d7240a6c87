//! Pagination engine: chunk loads, page navigation, and the renderable
//! page surface.
//!
//! Single-threaded and synchronous: chunk loads, layout passes, and
//! index builds run to completion on the calling thread. A render
//! consumer only ever sees a quiescent session between loads, gated by
//! the content-changed latch.

use std::path::PathBuf;
use std::sync::Arc;

use crate::bookmark::{Bookmark, BookmarkStore};
use crate::classify::{LineClassifier, LineStyle};
use crate::document::Document;
use crate::error::EngineError;
use crate::fonts::{font_for, TextMeasurer};
use crate::index::{index_path_for, ChunkIndex};
use crate::paging::{
    global_page, line_window, local_max_page, locate_global_page, page_count_for_lines,
    PagePosition,
};
use crate::session::{DisplayLine, LayoutSession, SessionLimits, Word};
use crate::wrap::{LayoutConfig, WordWrapper};

/// Engine configuration: geometry, pool capacities, and chunk size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Wrapping and pagination geometry.
    pub layout: LayoutConfig,
    /// Layout session pool capacities.
    pub limits: SessionLimits,
    /// Source lines per chunk.
    pub chunk_lines: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            limits: SessionLimits::default(),
            chunk_lines: 100,
        }
    }
}

impl EngineOptions {
    /// Convenience for a display width with default limits.
    pub fn for_display(width: u32) -> Self {
        Self {
            layout: LayoutConfig::for_display(width),
            ..Self::default()
        }
    }
}

/// Document layout and pagination engine.
///
/// Owns the chunk index, the single layout session, and the current
/// reading position. All operations are blocking and non-cancellable;
/// an index build on a large document reports progress through the
/// callback passed to [`PageEngine::open_with_progress`].
pub struct PageEngine {
    opts: EngineOptions,
    measurer: Arc<dyn TextMeasurer>,
    doc: Document,
    index_path: PathBuf,
    index: ChunkIndex,
    session: LayoutSession,
    classifier: LineClassifier,
    position: PagePosition,
    content_changed: bool,
    fallback_heading: String,
}

impl core::fmt::Debug for PageEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageEngine")
            .field("doc", &self.doc.path())
            .field("chunks", &self.index.len())
            .field("position", &self.position)
            .finish()
    }
}

impl PageEngine {
    /// Open a document, loading or building its chunk index, and load
    /// chunk 0.
    pub fn open(
        path: impl Into<PathBuf>,
        measurer: Arc<dyn TextMeasurer>,
        opts: EngineOptions,
    ) -> Result<Self, EngineError> {
        Self::open_with_progress(path, measurer, opts, |_, _| {})
    }

    /// Like [`PageEngine::open`], reporting index-build progress as
    /// `(chunks_counted, chunk_total)` after each chunk. The callback
    /// is not invoked when a persisted index is loaded.
    pub fn open_with_progress(
        path: impl Into<PathBuf>,
        measurer: Arc<dyn TextMeasurer>,
        opts: EngineOptions,
        on_progress: impl FnMut(usize, usize),
    ) -> Result<Self, EngineError> {
        let doc = Document::open(path)?;
        let index_path = index_path_for(doc.path());
        let mut engine = Self {
            opts,
            measurer,
            doc,
            index_path,
            index: ChunkIndex::default(),
            session: LayoutSession::new(opts.limits),
            classifier: LineClassifier::new(),
            position: PagePosition::default(),
            content_changed: false,
            fallback_heading: String::new(),
        };
        engine.ensure_index(on_progress)?;
        engine.load_chunk(0)?;
        Ok(engine)
    }

    /// Heading shown for chunks that contain no `# ` line, typically
    /// the document's display name.
    pub fn set_fallback_heading(&mut self, heading: impl Into<String>) {
        self.fallback_heading = heading.into();
    }

    /// Engine configuration.
    pub fn options(&self) -> &EngineOptions {
        &self.opts
    }

    /// The chunk table.
    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    /// The layout session holding the loaded chunk.
    pub fn session(&self) -> &LayoutSession {
        &self.session
    }

    /// Number of chunks in the document.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Current reading position.
    pub fn position(&self) -> PagePosition {
        self.position
    }

    /// 1-based global page number of the current position.
    pub fn global_page(&self) -> u32 {
        global_page(&self.index, self.position)
    }

    /// Total pages across all chunks.
    pub fn total_pages(&self) -> u32 {
        self.index.total_pages()
    }

    /// Highest valid local page in the loaded chunk.
    pub fn current_max_page(&self) -> u32 {
        local_max_page(self.session.display_line_count(), self.opts.layout.lines_per_page)
    }

    /// Heading of a chunk, falling back to the configured document name.
    pub fn chunk_heading(&self, chunk: usize) -> &str {
        match self.index.get(chunk) {
            Some(info) if !info.heading.is_empty() => &info.heading,
            _ => &self.fallback_heading,
        }
    }

    /// True once since the last successful load or navigation; a render
    /// consumer polls this to decide whether to repaint.
    pub fn take_content_changed(&mut self) -> bool {
        core::mem::take(&mut self.content_changed)
    }

    /// Load a chunk through the full layout pipeline, replacing the
    /// session contents and moving to its first page.
    ///
    /// On error the session is left reset; the previous chunk's layout
    /// is gone either way.
    pub fn load_chunk(&mut self, chunk: usize) -> Result<(), EngineError> {
        let offset = self
            .index
            .get(chunk)
            .ok_or(EngineError::BookmarkInvalid {
                chunk_index: chunk,
                chunk_count: self.index.len(),
            })?
            .offset;
        match self.layout_chunk_at(offset) {
            Ok(lines) => {
                log::debug!("chunk {} loaded: {} display lines", chunk, lines);
                self.position = PagePosition { chunk, page: 0 };
                self.content_changed = true;
                Ok(())
            }
            Err(e) => {
                self.session.reset();
                Err(e)
            }
        }
    }

    /// Advance one page, crossing into the next chunk past the last
    /// local page. Returns whether the position changed.
    pub fn next_page(&mut self) -> Result<bool, EngineError> {
        if self.position.page < self.current_max_page() {
            self.position.page += 1;
            self.content_changed = true;
            return Ok(true);
        }
        let next = self.position.chunk + 1;
        if next < self.index.len() {
            self.load_chunk(next)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Go back one page, crossing into the previous chunk's last page
    /// before the first local page. Returns whether the position
    /// changed.
    pub fn prev_page(&mut self) -> Result<bool, EngineError> {
        if self.position.page > 0 {
            self.position.page -= 1;
            self.content_changed = true;
            return Ok(true);
        }
        if self.position.chunk > 0 {
            let prev = self.position.chunk - 1;
            self.load_chunk(prev)?;
            self.position.page = self.current_max_page();
            return Ok(true);
        }
        Ok(false)
    }

    /// Jump to a 1-based global page number, clamping out-of-range
    /// targets to the first or last page.
    pub fn goto_global_page(&mut self, target: u32) -> Result<(), EngineError> {
        let pos = locate_global_page(&self.index, target);
        if pos.chunk != self.position.chunk {
            self.load_chunk(pos.chunk)?;
        }
        self.position.page = pos.page.min(self.current_max_page());
        self.content_changed = true;
        Ok(())
    }

    /// Persist the current position.
    pub fn save_bookmark(&self, store: &BookmarkStore) -> Result<(), EngineError> {
        store.save(Bookmark {
            chunk_index: self.position.chunk,
            local_page: self.position.page,
        })
    }

    /// Restore a persisted position.
    ///
    /// An absent bookmark, or one referencing a chunk outside the
    /// document, leaves the engine at its defaults and returns
    /// `Ok(false)`. An out-of-range local page clamps to the chunk's
    /// last page.
    pub fn restore_bookmark(&mut self, store: &BookmarkStore) -> Result<bool, EngineError> {
        let Some(bookmark) = store.load()? else {
            return Ok(false);
        };
        if bookmark.chunk_index >= self.index.len() {
            log::warn!(
                "bookmark rejected: chunk {} of {}",
                bookmark.chunk_index,
                self.index.len()
            );
            return Ok(false);
        }
        if bookmark.chunk_index != self.position.chunk {
            self.load_chunk(bookmark.chunk_index)?;
        }
        self.position.page = bookmark.local_page.min(self.current_max_page());
        self.content_changed = true;
        Ok(true)
    }

    /// Discard any persisted index, rebuild it through the layout
    /// pipeline, and persist the result. Blocking; progress is reported
    /// as `(chunks_counted, chunk_total)`.
    pub fn rebuild_index(
        &mut self,
        on_progress: impl FnMut(usize, usize),
    ) -> Result<(), EngineError> {
        self.build_and_save_index(on_progress)?;
        self.load_chunk(0)
    }

    fn ensure_index(
        &mut self,
        on_progress: impl FnMut(usize, usize),
    ) -> Result<(), EngineError> {
        match ChunkIndex::load(&self.index_path) {
            Ok(index) => {
                log::debug!(
                    "loaded index {}: {} chunks",
                    self.index_path.display(),
                    index.len()
                );
                self.index = index;
                Ok(())
            }
            Err(EngineError::IndexCorrupt { reason }) => {
                log::warn!(
                    "index {} corrupt ({}), rebuilding",
                    self.index_path.display(),
                    reason
                );
                self.build_and_save_index(on_progress)
            }
            Err(EngineError::FileUnavailable { .. }) => {
                log::debug!("no index at {}, building", self.index_path.display());
                self.build_and_save_index(on_progress)
            }
            Err(e) => Err(e),
        }
    }

    /// Two-pass index build: scan for offsets and headings, then load
    /// every chunk through the layout pipeline purely to count pages.
    fn build_and_save_index(
        &mut self,
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<(), EngineError> {
        let mut index = ChunkIndex::scan(&self.doc, self.opts.chunk_lines)?;
        let total = index.len();
        for chunk in 0..total {
            let offset = match index.get(chunk) {
                Some(info) => info.offset,
                None => break,
            };
            let lines = self.layout_chunk_at(offset)?;
            index.set_page_count(
                chunk,
                page_count_for_lines(lines, self.opts.layout.lines_per_page),
            );
            on_progress(chunk + 1, total);
        }
        index.save(&self.index_path)?;
        self.index = index;
        self.session.reset();
        Ok(())
    }

    /// Classify, segment, and wrap up to `chunk_lines` source lines
    /// starting at `offset` into the session. Returns the display-line
    /// count.
    fn layout_chunk_at(&mut self, offset: u64) -> Result<u32, EngineError> {
        self.session.reset();
        self.classifier.reset();
        let mut reader = self.doc.reader_at(offset)?;
        for _ in 0..self.opts.chunk_lines {
            let Some(raw) = reader.next_line()? else {
                break;
            };
            let classified = self.classifier.classify(raw);
            WordWrapper::new(&self.opts.layout, self.measurer.as_ref(), &mut self.session)
                .wrap_line(classified)?;
        }
        Ok(self.session.display_line_count())
    }

    /// Renderable window of the current page: the display lines whose
    /// index falls in `[page * lines_per_page, (page + 1) * lines_per_page)`,
    /// each resolved with its source style and words.
    pub fn page_lines(&self) -> PageLines<'_> {
        let range = line_window(
            self.position.page,
            self.opts.layout.lines_per_page,
            self.session.display_line_count(),
        );
        PageLines {
            session: &self.session,
            range,
        }
    }
}

/// Iterator over the renderable lines of one page.
pub struct PageLines<'a> {
    session: &'a LayoutSession,
    range: core::ops::Range<u32>,
}

impl<'a> Iterator for PageLines<'a> {
    type Item = PageLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        let line = self.session.display_lines().get(index as usize)?;
        let source = self.session.source_for_display(index);
        Some(PageLine {
            session: self.session,
            line: *line,
            index,
            style: source.map_or(LineStyle::Text, |s| s.style),
            ordered_number: source.and_then(|s| s.ordered_number),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

/// One drawable display line with its resolved style context.
#[derive(Clone, Copy)]
pub struct PageLine<'a> {
    session: &'a LayoutSession,
    line: DisplayLine,
    /// Display-line index within the chunk.
    pub index: u32,
    /// Block style of the owning source line.
    pub style: LineStyle,
    /// Running list number for ordered items.
    pub ordered_number: Option<u32>,
}

impl<'a> PageLine<'a> {
    /// Words on this line. Empty for Blank and Rule lines.
    pub fn words(&self) -> impl Iterator<Item = Word<'a>> + 'a {
        let session = self.session;
        session.words_for(self.line)
    }

    /// Number of words on this line.
    pub fn word_count(&self) -> usize {
        self.line.word_count()
    }

    /// Tallest glyph height on the line, for baseline alignment.
    ///
    /// This is the measuring pass of the draw contract: a renderer
    /// measures the whole line first to pick a common baseline, then
    /// emits the words.
    pub fn max_glyph_height(&self, measurer: &dyn TextMeasurer) -> u32 {
        self.words()
            .map(|w| {
                let font = font_for(self.style, w.bold, w.italic);
                measurer.measure_px(w.text, font).1
            })
            .max()
            .unwrap_or(0)
    }
}
