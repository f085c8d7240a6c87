//! Inline bold/italic run segmentation.
//!
//! Splits a classified line's content into style-tagged runs on `**`
//! and `*` delimiters. Unmatched delimiters degrade gracefully: the run
//! extends to the end of the line instead of failing, so malformed
//! markup still renders as readable text.

use smallvec::SmallVec;

/// One style-tagged run of a source line's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InlineRun<'a> {
    /// Run text with delimiters stripped.
    pub text: &'a str,
    /// Bold flag (`**...**`).
    pub bold: bool,
    /// Italic flag (`*...*`).
    pub italic: bool,
}

/// Ordered inline runs of one line. Inline-allocated for the common
/// case of a handful of runs per line.
pub type InlineRuns<'a> = SmallVec<[InlineRun<'a>; 8]>;

/// Segment a content string into bold/italic/plain runs, left to right.
pub fn segment_runs(content: &str) -> InlineRuns<'_> {
    let mut runs = InlineRuns::new();
    let mut pos = 0;

    while pos < content.len() {
        let rest = &content[pos..];
        if let Some(body) = rest.strip_prefix("**") {
            let (text, consumed) = match body.find("**") {
                Some(end) => (&body[..end], 2 + end + 2),
                None => (body, rest.len()),
            };
            push_run(&mut runs, text, true, false);
            pos += consumed;
        } else if let Some(body) = rest.strip_prefix('*') {
            let (text, consumed) = match body.find('*') {
                Some(end) => (&body[..end], 1 + end + 1),
                None => (body, rest.len()),
            };
            push_run(&mut runs, text, false, true);
            pos += consumed;
        } else {
            // Plain run up to the next delimiter of either kind; any
            // `**` necessarily begins with `*`, so one search suffices.
            let (text, consumed) = match rest.find('*') {
                Some(end) => (&rest[..end], end),
                None => (rest, rest.len()),
            };
            push_run(&mut runs, text, false, false);
            pos += consumed;
        }
    }

    runs
}

fn push_run<'a>(runs: &mut InlineRuns<'a>, text: &'a str, bold: bool, italic: bool) {
    if !text.is_empty() {
        runs.push(InlineRun { text, bold, italic });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(content: &str) -> Vec<(String, bool, bool)> {
        segment_runs(content)
            .iter()
            .map(|r| (r.text.to_string(), r.bold, r.italic))
            .collect()
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(runs("hello world"), vec![("hello world".into(), false, false)]);
    }

    #[test]
    fn bold_run_in_the_middle() {
        assert_eq!(
            runs("Hello **world** again"),
            vec![
                ("Hello ".into(), false, false),
                ("world".into(), true, false),
                (" again".into(), false, false),
            ]
        );
    }

    #[test]
    fn italic_run() {
        assert_eq!(
            runs("an *italic* word"),
            vec![
                ("an ".into(), false, false),
                ("italic".into(), false, true),
                (" word".into(), false, false),
            ]
        );
    }

    #[test]
    fn unmatched_bold_extends_to_end() {
        assert_eq!(
            runs("broken **rest of line"),
            vec![
                ("broken ".into(), false, false),
                ("rest of line".into(), true, false),
            ]
        );
    }

    #[test]
    fn unmatched_italic_extends_to_end() {
        assert_eq!(
            runs("*leaning"),
            vec![("leaning".into(), false, true)]
        );
    }

    #[test]
    fn adjacent_styles() {
        assert_eq!(
            runs("**a***b*"),
            vec![("a".into(), true, false), ("b".into(), false, true)]
        );
    }

    #[test]
    fn empty_delimited_runs_are_dropped() {
        assert_eq!(runs("****"), Vec::<(String, bool, bool)>::new());
        assert_eq!(runs(""), Vec::<(String, bool, bool)>::new());
    }
}
