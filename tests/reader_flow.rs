mod common;

use common::{measurer, write_doc};
use md_stream::{EngineOptions, LineStyle, PageEngine, PagePosition};

const SAMPLE_DOC: &str = "# Intro\nHello **world**\n\n- item one\n- item two\n";

#[test]
fn small_document_lays_out_as_one_chunk() {
    let (_dir, path) = write_doc(SAMPLE_DOC);
    let engine = PageEngine::open(&path, measurer(), EngineOptions::default()).expect("open");

    assert_eq!(engine.chunk_count(), 1);
    assert_eq!(engine.chunk_heading(0), "Intro");
    assert_eq!(engine.total_pages(), 1);

    let lines: Vec<_> = engine.page_lines().collect();
    assert_eq!(lines.len(), 5);

    assert_eq!(lines[0].style, LineStyle::Heading1);
    let heading: Vec<_> = lines[0].words().map(|w| w.text.to_string()).collect();
    assert_eq!(heading, vec!["Intro"]);

    assert_eq!(lines[1].style, LineStyle::Text);
    let body: Vec<_> = lines[1].words().collect();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].text, "Hello");
    assert!(!body[0].bold);
    assert_eq!(body[1].text, "world");
    assert!(body[1].bold);

    assert_eq!(lines[2].style, LineStyle::Blank);
    assert_eq!(lines[2].word_count(), 0);

    for (line, expected) in lines[3..].iter().zip(["one", "two"]) {
        assert_eq!(line.style, LineStyle::Bullet);
        let words: Vec<_> = line.words().map(|w| w.text.to_string()).collect();
        assert_eq!(words, vec!["item".to_string(), expected.to_string()]);
    }
}

#[test]
fn heading_fallback_covers_chunks_without_h1() {
    let (_dir, path) = write_doc("just prose\nno headings here\n");
    let mut engine = PageEngine::open(&path, measurer(), EngineOptions::default()).expect("open");
    assert_eq!(engine.chunk_heading(0), "");
    engine.set_fallback_heading("book.md");
    assert_eq!(engine.chunk_heading(0), "book.md");
}

fn six_line_engine(dir_doc: &(tempfile::TempDir, std::path::PathBuf)) -> PageEngine {
    // Two source lines per chunk, one display line per page: three
    // chunks of two pages each.
    let mut opts = EngineOptions::default();
    opts.chunk_lines = 2;
    opts.layout.lines_per_page = 1;
    PageEngine::open(&dir_doc.1, measurer(), opts).expect("open")
}

#[test]
fn page_navigation_crosses_chunk_boundaries() {
    let doc = write_doc("l1\nl2\nl3\nl4\nl5\nl6\n");
    let mut engine = six_line_engine(&doc);
    assert_eq!(engine.chunk_count(), 3);
    assert_eq!(engine.total_pages(), 6);
    assert_eq!(engine.global_page(), 1);

    assert!(engine.next_page().expect("next"));
    assert_eq!(engine.position(), PagePosition { chunk: 0, page: 1 });

    // Past the chunk's last page: the next chunk loads at its first page.
    assert!(engine.next_page().expect("next"));
    assert_eq!(engine.position(), PagePosition { chunk: 1, page: 0 });
    assert_eq!(engine.global_page(), 3);

    // And back across the same boundary to the previous chunk's last page.
    assert!(engine.prev_page().expect("prev"));
    assert_eq!(engine.position(), PagePosition { chunk: 0, page: 1 });

    // Clamped at the document edges.
    engine.goto_global_page(1).expect("goto");
    assert!(!engine.prev_page().expect("prev"));
    engine.goto_global_page(6).expect("goto");
    assert_eq!(engine.position(), PagePosition { chunk: 2, page: 1 });
    assert!(!engine.next_page().expect("next"));
}

#[test]
fn global_page_numbering_is_additive() {
    let doc = write_doc("l1\nl2\nl3\nl4\nl5\nl6\n");
    let mut engine = six_line_engine(&doc);
    for expected in 1..=6u32 {
        engine.goto_global_page(expected).expect("goto");
        assert_eq!(engine.global_page(), expected);
    }
    // Out-of-range targets clamp instead of failing.
    engine.goto_global_page(0).expect("goto");
    assert_eq!(engine.global_page(), 1);
    engine.goto_global_page(99).expect("goto");
    assert_eq!(engine.global_page(), 6);
}

#[test]
fn content_changed_latch_tracks_loads_and_turns() {
    let doc = write_doc("l1\nl2\nl3\nl4\nl5\nl6\n");
    let mut engine = six_line_engine(&doc);
    assert!(engine.take_content_changed());
    assert!(!engine.take_content_changed());
    engine.next_page().expect("next");
    assert!(engine.take_content_changed());
}

#[test]
fn pagination_example_thirty_lines_three_pages() {
    let body: String = (0..30).map(|i| format!("line {}\n", i)).collect();
    let mut opts = EngineOptions::default();
    opts.layout.lines_per_page = 12;
    let (_dir, path) = write_doc(&body);
    let engine = PageEngine::open(&path, measurer(), opts).expect("open");

    assert_eq!(engine.chunk_count(), 1);
    assert_eq!(engine.session().display_line_count(), 30);
    assert_eq!(engine.current_max_page(), 2);
    assert_eq!(engine.total_pages(), 3);
    assert_eq!(engine.page_lines().count(), 12);
}

#[test]
fn page_window_is_a_display_line_slice() {
    let body: String = (0..30).map(|i| format!("line {}\n", i)).collect();
    let (_dir, path) = write_doc(&body);
    let mut engine =
        PageEngine::open(&path, measurer(), EngineOptions::default()).expect("open");

    engine.goto_global_page(3).expect("goto");
    let indices: Vec<_> = engine.page_lines().map(|l| l.index).collect();
    assert_eq!(indices, vec![24, 25, 26, 27, 28, 29]);
}

#[test]
fn baseline_height_reports_tallest_glyph() {
    let (_dir, path) = write_doc(SAMPLE_DOC);
    let engine = PageEngine::open(&path, measurer(), EngineOptions::default()).expect("open");
    let lines: Vec<_> = engine.page_lines().collect();
    let m = common::FixedAdvance;
    assert_eq!(lines[0].max_glyph_height(&m), 28); // heading face
    assert_eq!(lines[1].max_glyph_height(&m), 16); // body face
    assert_eq!(lines[2].max_glyph_height(&m), 0); // blank line
}
