//! Border line composition. Pure string builders so the layout of the frame
//! can be tested without a surface.

use core_text::{center, display_width, truncate};

pub(crate) const CORNER: char = '+';
pub(crate) const HORIZONTAL: char = '-';
pub(crate) const VERTICAL: char = '|';
pub(crate) const SCROLL_UP_CORNER: char = '^';
pub(crate) const SCROLL_DOWN_CORNER: char = 'v';
pub(crate) const THUMB: char = '=';

/// `+-- title --+` (or `^` as right corner when scrollable). `inner` is the
/// number of columns between the corners.
pub(crate) fn top_border(title: &str, inner: usize, scrollable: bool) -> String {
    let padded = format!(" {title} ");
    let centered = center(&padded, inner, HORIZONTAL);
    let mut out = String::with_capacity(inner + 2);
    out.push(CORNER);
    out.push_str(truncate(&centered, inner));
    out.push(if scrollable { SCROLL_UP_CORNER } else { CORNER });
    out
}

/// `+------ status +` (or `v` as right corner when scrollable). Status text is
/// right-aligned and truncated when the frame is too narrow.
pub(crate) fn bottom_border(status: &str, inner: usize, scrollable: bool) -> String {
    let info = if status.is_empty() {
        String::new()
    } else {
        format!(" {status} ")
    };
    let info = truncate(&info, inner);
    let dashes = inner.saturating_sub(display_width(info));
    let mut out = String::with_capacity(inner + 2);
    out.push(CORNER);
    out.extend(std::iter::repeat_n(HORIZONTAL, dashes));
    out.push_str(info);
    out.push(if scrollable { SCROLL_DOWN_CORNER } else { CORNER });
    out
}

/// Left edge plus blank interior for one content row.
pub(crate) fn side_fill(inner: usize) -> String {
    let mut out = String::with_capacity(inner + 1);
    out.push(VERTICAL);
    out.extend(std::iter::repeat_n(' ', inner));
    out
}

/// Row index that carries the scrollbar thumb: `floor(scroll_pos * rows)`.
pub(crate) fn thumb_row(scroll_pos: Option<f64>, rows: i32) -> Option<i32> {
    scroll_pos.map(|p| (p * f64::from(rows)).floor() as i32)
}
