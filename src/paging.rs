//! Page arithmetic over display lines and chunk page counts.
//!
//! Local pages are 0-based windows of `lines_per_page` display lines
//! inside one chunk; global page numbers are 1-based and additive
//! across the chunk table.

use core::ops::Range;

use crate::index::ChunkIndex;

/// A reading position: chunk plus 0-based local page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PagePosition {
    /// Chunk index into the document's chunk table.
    pub chunk: usize,
    /// Local page within the chunk.
    pub page: u32,
}

/// Pages needed for `display_lines` lines at `lines_per_page`.
pub fn page_count_for_lines(display_lines: u32, lines_per_page: u32) -> u32 {
    let per_page = lines_per_page.max(1);
    display_lines.div_ceil(per_page)
}

/// Highest valid local page index for a chunk; 0 for an empty chunk.
pub fn local_max_page(display_lines: u32, lines_per_page: u32) -> u32 {
    page_count_for_lines(display_lines, lines_per_page).saturating_sub(1)
}

/// Display-line window of a local page, clipped to the chunk.
pub fn line_window(page: u32, lines_per_page: u32, display_lines: u32) -> Range<u32> {
    let per_page = lines_per_page.max(1);
    let start = page.saturating_mul(per_page).min(display_lines);
    let end = start.saturating_add(per_page).min(display_lines);
    start..end
}

/// 1-based global page number of a position.
pub fn global_page(index: &ChunkIndex, pos: PagePosition) -> u32 {
    1 + index.pages_before(pos.chunk) + pos.page
}

/// Position of a 1-based global page number.
///
/// Out-of-range targets clamp to the first or last valid page.
pub fn locate_global_page(index: &ChunkIndex, target: u32) -> PagePosition {
    let total = index.total_pages();
    if total == 0 {
        return PagePosition::default();
    }
    let target = target.clamp(1, total);

    let mut before = 0u32;
    for (chunk, info) in index.chunks().iter().enumerate() {
        let pages = info.page_count.unwrap_or(0);
        if target <= before + pages {
            return PagePosition {
                chunk,
                page: target - before - 1,
            };
        }
        before += pages;
    }

    // Unreachable with a complete index; fall back to the last page.
    let last = index.len().saturating_sub(1);
    PagePosition {
        chunk: last,
        page: index
            .get(last)
            .and_then(|c| c.page_count)
            .unwrap_or(1)
            .saturating_sub(1),
    }
}
