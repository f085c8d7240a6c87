//! Markdown line classification.
//!
//! One raw source line maps to exactly one [`LineStyle`] plus its
//! stripped content. Classification is line-oriented on purpose: the
//! engine never holds more than one source line of raw text in memory,
//! so multi-line constructs (code-block bodies, lazy continuations) are
//! treated as plain text lines.

/// Block style of a single source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Plain body text.
    Text,
    /// Empty line; occupies one zero-word display line.
    Blank,
    /// Horizontal rule (`---`); occupies one zero-word display line.
    Rule,
    /// `# ` heading.
    Heading1,
    /// `## ` heading.
    Heading2,
    /// `### ` heading.
    Heading3,
    /// `> ` block quote.
    Quote,
    /// `- ` unordered list item.
    Bullet,
    /// `1. ` ordered list item.
    OrderedItem,
    /// Code fence marker. Fence bodies are classified as whatever they
    /// look like on their own; no fence state is tracked.
    Code,
}

impl LineStyle {
    /// Indentation units beyond the base margin for this style.
    pub fn indent_units(self) -> u32 {
        match self {
            Self::Quote | Self::Code => 1,
            Self::Bullet | Self::OrderedItem => 2,
            _ => 0,
        }
    }
}

/// A classified source line borrowing the trimmed raw text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Block style.
    pub style: LineStyle,
    /// Content with the style prefix stripped.
    pub content: &'a str,
    /// Running list number, present only for [`LineStyle::OrderedItem`].
    pub ordered_number: Option<u32>,
}

/// Stateful line classifier.
///
/// Holds the running ordered-list counter: it increments on each
/// consecutive `OrderedItem` line and resets to 1 whenever any other
/// style is seen. The counter is session state and is reset on every
/// chunk load, not carried across chunk boundaries.
#[derive(Debug)]
pub struct LineClassifier {
    next_ordered: u32,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    /// Create a classifier with the list counter at 1.
    pub fn new() -> Self {
        Self { next_ordered: 1 }
    }

    /// Reset the ordered-list counter, as on a chunk load.
    pub fn reset(&mut self) {
        self.next_ordered = 1;
    }

    /// Classify one trimmed source line.
    ///
    /// The input must already have its newline, trailing carriage
    /// return, and surrounding whitespace removed (see
    /// [`crate::document::LineReader`]).
    pub fn classify<'a>(&mut self, line: &'a str) -> ClassifiedLine<'a> {
        let (style, content) = if line.is_empty() {
            (LineStyle::Blank, "")
        } else if line == "---" {
            (LineStyle::Rule, "")
        } else if let Some(rest) = line.strip_prefix("### ") {
            (LineStyle::Heading3, rest)
        } else if let Some(rest) = line.strip_prefix("## ") {
            (LineStyle::Heading2, rest)
        } else if let Some(rest) = line.strip_prefix("# ") {
            (LineStyle::Heading1, rest)
        } else if let Some(rest) = line.strip_prefix("> ") {
            (LineStyle::Quote, rest)
        } else if let Some(rest) = line.strip_prefix("- ") {
            (LineStyle::Bullet, rest)
        } else if line.starts_with("```") {
            // Fence markers carry no renderable content of their own.
            (LineStyle::Code, "")
        } else if let Some(rest) = ordered_item_content(line) {
            let number = self.next_ordered;
            self.next_ordered += 1;
            return ClassifiedLine {
                style: LineStyle::OrderedItem,
                content: rest,
                ordered_number: Some(number),
            };
        } else {
            (LineStyle::Text, line)
        };

        self.next_ordered = 1;
        ClassifiedLine {
            style,
            content,
            ordered_number: None,
        }
    }
}

/// `<digit>. ` prefix check; returns the remainder on match.
fn ordered_item_content(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2] == b' ' {
        Some(&line[3..])
    } else {
        None
    }
}
