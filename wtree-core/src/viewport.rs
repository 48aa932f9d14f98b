//! Windowing of a long list into a fixed number of rows.

use std::ops::Range;

/// Largest valid scroll offset for a list of `len` rows shown `height` at a time.
pub fn max_offset(len: usize, height: usize) -> usize {
    len.saturating_sub(height.max(1))
}

/// Indices of the rows currently on screen.
pub fn visible_range(scroll_offset: usize, len: usize, height: usize) -> Range<usize> {
    let height = height.max(1);
    if len <= height {
        return 0..len;
    }
    let start = scroll_offset.min(max_offset(len, height));
    start..start + height
}

/// Slide the window the minimum distance needed to keep `cursor` on screen.
pub fn adjust_scroll(cursor: usize, scroll_offset: usize, len: usize, height: usize) -> usize {
    let height = height.max(1);
    if len <= height {
        return 0;
    }

    let mut offset = scroll_offset;
    if cursor < offset {
        offset = cursor;
    } else if cursor >= offset + height {
        offset = cursor + 1 - height;
    }
    offset.min(max_offset(len, height))
}

/// `(visible, total)` for the ` (visible/total)` indicator, shown only when
/// the list overflows the viewport.
pub fn scroll_indicator(range: &Range<usize>, len: usize, height: usize) -> Option<(usize, usize)> {
    (len > height.max(1)).then(|| (range.len(), len))
}
