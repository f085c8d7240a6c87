//! Font variant selection and the consumed text-measurement capability.

use crate::classify::LineStyle;

/// Font face selector handed to the [`TextMeasurer`].
///
/// Variants map one-to-one onto the faces a display backend is expected
/// to provide. A backend without a true italic face may alias
/// [`FontVariant::Italic`] (and the italic half of
/// [`FontVariant::BoldItalic`]) to its roman face; that is an accepted
/// degradation, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontVariant {
    /// Body text, regular weight.
    Regular,
    /// Body text, bold.
    Bold,
    /// Body text, italic.
    Italic,
    /// Body text, bold italic.
    BoldItalic,
    /// Large face for `# ` headings.
    Heading1,
    /// Medium face for `## ` headings.
    Heading2,
    /// Small face for `### ` headings.
    Heading3,
    /// Dedicated face for quotes and list items.
    Accent,
    /// Monospace bold, used for code regardless of run flags.
    MonoBold,
}

/// Select the face for a word given its line style and inline flags.
///
/// Headings ignore inline flags entirely (there is no italic heading
/// face); code is always monospace-bold; quotes and list items share
/// the accent face.
pub fn font_for(style: LineStyle, bold: bool, italic: bool) -> FontVariant {
    match style {
        LineStyle::Heading1 => FontVariant::Heading1,
        LineStyle::Heading2 => FontVariant::Heading2,
        LineStyle::Heading3 => FontVariant::Heading3,
        LineStyle::Code => FontVariant::MonoBold,
        LineStyle::Quote | LineStyle::Bullet | LineStyle::OrderedItem => FontVariant::Accent,
        _ => match (bold, italic) {
            (true, true) => FontVariant::BoldItalic,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (false, false) => FontVariant::Regular,
        },
    }
}

/// Text measurement hook provided by the display backend.
///
/// The engine issues no drawing calls; this is its only window into
/// glyph geometry.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text for the given face, in device pixels.
    ///
    /// Must be deterministic for identical inputs within a session; the
    /// chunk indexer relies on this when pre-computing page counts.
    fn measure_px(&self, text: &str, font: FontVariant) -> (u32, u32);
}
