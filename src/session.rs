//! Per-chunk layout session and its bounded pools.
//!
//! A [`LayoutSession`] owns all word text, word references, display
//! lines, and source lines of exactly one loaded chunk. Pool contents
//! are meaningful only between one chunk load and the next; every load
//! resets all four cursors to zero, invalidating the previous chunk
//! wholesale. Word text lives in an arena addressed by spans, so no
//! raw pointers outlive a reset.
//!
//! Capacities are explicit. Overflow yields a recoverable
//! [`EngineError::CapacityExceeded`] for the chunk load in progress
//! rather than silently dropping content.

use core::ops::Range;

use crate::classify::LineStyle;
use crate::error::EngineError;

/// Pool capacities for one layout session.
///
/// Sized so a chunk's worth of a typical document fits comfortably.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLimits {
    /// Arena capacity for interned word text, in bytes.
    pub max_text_bytes: usize,
    /// Maximum word references per chunk.
    pub max_words: usize,
    /// Maximum display lines per chunk.
    pub max_display_lines: usize,
    /// Maximum source lines per chunk.
    pub max_source_lines: usize,
    /// Interned words are truncated to this many bytes.
    pub max_word_bytes: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_text_bytes: 64 * 1024,
            max_words: 8192,
            max_display_lines: 4096,
            max_source_lines: 512,
            max_word_bytes: 32,
        }
    }
}

impl SessionLimits {
    /// Embedded-focused preset with smaller bounds.
    pub fn embedded() -> Self {
        Self {
            max_text_bytes: 16 * 1024,
            max_words: 2048,
            max_display_lines: 1024,
            max_source_lines: 256,
            max_word_bytes: 24,
        }
    }
}

/// Stable handle into the session's word-text arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TextSpan {
    start: u32,
    len: u16,
}

/// One word of a display line: interned text plus inline flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordRef {
    span: TextSpan,
    /// Bold inline flag.
    pub bold: bool,
    /// Italic inline flag.
    pub italic: bool,
}

/// A word resolved against the arena for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Word<'a> {
    /// Interned (possibly truncated) word text.
    pub text: &'a str,
    /// Bold inline flag.
    pub bold: bool,
    /// Italic inline flag.
    pub italic: bool,
}

/// One visually wrapped line, the unit of pagination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    /// Monotonically increasing line index within the chunk; the
    /// scroll/page coordinate.
    pub line: u32,
    word_start: u32,
    word_count: u32,
}

impl DisplayLine {
    /// Range into the session's word sequence.
    pub fn word_range(&self) -> Range<usize> {
        let start = self.word_start as usize;
        start..start + self.word_count as usize
    }

    /// Number of words on this line. Blank and Rule lines have zero.
    pub fn word_count(&self) -> usize {
        self.word_count as usize
    }
}

/// One logical line of the source document within the loaded chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// Classified block style.
    pub style: LineStyle,
    /// Running list number for `OrderedItem` lines.
    pub ordered_number: Option<u32>,
    line_start: u32,
    line_count: u32,
}

impl SourceLine {
    /// Range into the chunk's display-line sequence.
    pub fn display_range(&self) -> Range<usize> {
        let start = self.line_start as usize;
        start..start + self.line_count as usize
    }
}

/// Bounded pools for the currently loaded chunk.
#[derive(Debug)]
pub struct LayoutSession {
    limits: SessionLimits,
    text: String,
    words: Vec<WordRef>,
    lines: Vec<DisplayLine>,
    sources: Vec<SourceLine>,
}

impl LayoutSession {
    /// Create an empty session with the given pool capacities.
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            limits,
            text: String::new(),
            words: Vec::new(),
            lines: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Configured capacities.
    pub fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    /// Reset all pool cursors to zero, invalidating the previous chunk.
    pub fn reset(&mut self) {
        self.text.clear();
        self.words.clear();
        self.lines.clear();
        self.sources.clear();
    }

    /// Intern a word, truncating it to the configured maximum length.
    pub(crate) fn intern(&mut self, word: &str) -> Result<TextSpan, EngineError> {
        let word = truncate_str(word, self.limits.max_word_bytes);
        let needed = self.text.len() + word.len();
        if needed > self.limits.max_text_bytes {
            return Err(EngineError::capacity(
                "word-text",
                needed,
                self.limits.max_text_bytes,
            ));
        }
        let start = self.text.len() as u32;
        self.text.push_str(word);
        Ok(TextSpan {
            start,
            len: word.len() as u16,
        })
    }

    /// Text behind a span handed out by [`Self::intern`].
    pub(crate) fn span_text(&self, span: TextSpan) -> &str {
        let start = span.start as usize;
        let end = start + span.len as usize;
        self.text.get(start..end).unwrap_or("")
    }

    pub(crate) fn push_word(
        &mut self,
        span: TextSpan,
        bold: bool,
        italic: bool,
    ) -> Result<(), EngineError> {
        if self.words.len() >= self.limits.max_words {
            return Err(EngineError::capacity(
                "words",
                self.words.len() + 1,
                self.limits.max_words,
            ));
        }
        self.words.push(WordRef { span, bold, italic });
        Ok(())
    }

    /// Close a display line covering `word_count` words starting at
    /// `word_start`; returns its line index.
    pub(crate) fn push_display_line(
        &mut self,
        word_start: u32,
        word_count: u32,
    ) -> Result<u32, EngineError> {
        if self.lines.len() >= self.limits.max_display_lines {
            return Err(EngineError::capacity(
                "display-lines",
                self.lines.len() + 1,
                self.limits.max_display_lines,
            ));
        }
        let line = self.lines.len() as u32;
        self.lines.push(DisplayLine {
            line,
            word_start,
            word_count,
        });
        Ok(line)
    }

    pub(crate) fn push_source_line(
        &mut self,
        style: LineStyle,
        ordered_number: Option<u32>,
        line_start: u32,
        line_count: u32,
    ) -> Result<(), EngineError> {
        if self.sources.len() >= self.limits.max_source_lines {
            return Err(EngineError::capacity(
                "source-lines",
                self.sources.len() + 1,
                self.limits.max_source_lines,
            ));
        }
        self.sources.push(SourceLine {
            style,
            ordered_number,
            line_start,
            line_count,
        });
        Ok(())
    }

    /// Number of word references in the loaded chunk.
    pub fn word_count(&self) -> u32 {
        self.words.len() as u32
    }

    /// Number of display lines in the loaded chunk.
    pub fn display_line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Display lines of the loaded chunk, in layout order.
    pub fn display_lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Source lines of the loaded chunk, in document order.
    pub fn source_lines(&self) -> &[SourceLine] {
        &self.sources
    }

    /// Resolve one word reference against the arena.
    pub fn resolve(&self, word: &WordRef) -> Word<'_> {
        Word {
            text: self.span_text(word.span),
            bold: word.bold,
            italic: word.italic,
        }
    }

    /// Words of one display line, resolved for rendering.
    pub fn words_for(&self, line: DisplayLine) -> impl Iterator<Item = Word<'_>> {
        self.words
            .get(line.word_range())
            .unwrap_or(&[])
            .iter()
            .map(|w| self.resolve(w))
    }

    /// Source line covering the given display line, if any.
    ///
    /// Source-line display ranges are ascending and non-overlapping, so
    /// this is a binary search. Zero-length ranges (fence markers that
    /// produced no words) never match.
    pub fn source_for_display(&self, display_index: u32) -> Option<&SourceLine> {
        let idx = self
            .sources
            .binary_search_by(|s| {
                if display_index < s.line_start {
                    core::cmp::Ordering::Greater
                } else if display_index >= s.line_start + s.line_count {
                    core::cmp::Ordering::Less
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .ok()?;
        self.sources.get(idx)
    }
}

/// Truncate to a byte limit without splitting a UTF-8 sequence.
fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
