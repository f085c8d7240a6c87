//! Greedy word-wrap into width-bounded display lines.

use crate::classify::{ClassifiedLine, LineStyle};
use crate::error::EngineError;
use crate::fonts::{font_for, TextMeasurer};
use crate::inline::segment_runs;
use crate::session::LayoutSession;

/// Geometry configuration for line wrapping and pagination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Physical display width in pixels.
    pub display_width: u32,
    /// Fixed horizontal margin subtracted from the display width.
    pub margin_px: u32,
    /// One indentation unit; quotes and code indent by one, list items
    /// by two.
    pub indent_unit_px: u32,
    /// Fixed inter-word space width.
    pub space_px: u32,
    /// Display lines shown per page.
    pub lines_per_page: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            display_width: 480,
            margin_px: 32,
            indent_unit_px: 16,
            space_px: 4,
            lines_per_page: 12,
        }
    }
}

impl LayoutConfig {
    /// Convenience for a display width with default spacing.
    pub fn for_display(width: u32) -> Self {
        Self {
            display_width: width,
            ..Self::default()
        }
    }

    /// Usable line width for a style after margin and indentation.
    pub fn available_width(&self, style: LineStyle) -> u32 {
        self.display_width
            .saturating_sub(self.margin_px)
            .saturating_sub(style.indent_units() * self.indent_unit_px)
            .max(1)
    }
}

/// Wraps classified lines into the session's display-line pool.
pub struct WordWrapper<'a> {
    cfg: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    session: &'a mut LayoutSession,
}

impl<'a> WordWrapper<'a> {
    /// Create a wrapper writing into `session`.
    pub fn new(
        cfg: &'a LayoutConfig,
        measurer: &'a dyn TextMeasurer,
        session: &'a mut LayoutSession,
    ) -> Self {
        Self {
            cfg,
            measurer,
            session,
        }
    }

    /// Lay out one classified source line.
    ///
    /// Blank and Rule lines short-circuit to a single zero-word display
    /// line so they still occupy a pagination slot without measurement.
    /// A word wider than the available width occupies a line of its own
    /// rather than being dropped; the width comparison is strict, so a
    /// word that exactly fills the remaining width stays on its line.
    pub fn wrap_line(&mut self, line: ClassifiedLine<'_>) -> Result<(), EngineError> {
        let line_start = self.session.display_line_count();

        if matches!(line.style, LineStyle::Blank | LineStyle::Rule) {
            self.session
                .push_display_line(self.session.word_count(), 0)?;
            self.session
                .push_source_line(line.style, None, line_start, 1)?;
            return Ok(());
        }

        let avail = self.cfg.available_width(line.style);
        let mut word_start = self.session.word_count();
        let mut width: u32 = 0;

        for run in segment_runs(line.content) {
            let font = font_for(line.style, run.bold, run.italic);
            for word in run.text.split(' ') {
                if word.is_empty() {
                    continue;
                }
                let span = self.session.intern(word)?;
                let (word_w, _) = self.measurer.measure_px(self.session.span_text(span), font);
                let packed = self.session.word_count() - word_start;
                let projected = if packed == 0 {
                    width + word_w
                } else {
                    width + self.cfg.space_px + word_w
                };
                if projected > avail && packed > 0 {
                    self.session.push_display_line(word_start, packed)?;
                    word_start = self.session.word_count();
                    width = word_w;
                } else {
                    width = projected;
                }
                self.session.push_word(span, run.bold, run.italic)?;
            }
        }

        let trailing = self.session.word_count() - word_start;
        if trailing > 0 {
            self.session.push_display_line(word_start, trailing)?;
        }

        let line_count = self.session.display_line_count() - line_start;
        self.session
            .push_source_line(line.style, line.ordered_number, line_start, line_count)?;
        Ok(())
    }
}
