//! Grapheme cluster display width helpers.
//!
//! Every width decision in the workspace goes through `egc_width`; the other
//! helpers are thin compositions over grapheme iteration.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Column width of a single extended grapheme cluster.
///
/// Clusters are never narrower than one cell once they contain a visible
/// base; zero-width input (lone combining marks, control chars) reports 0.
pub fn egc_width(egc: &str) -> usize {
    let w = UnicodeWidthStr::width(egc);
    if w > 2 { 2 } else { w }
}

/// Total display width of `s`.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(egc_width).sum()
}

/// Longest prefix of `s` that fits in `cols` columns.
pub fn truncate(s: &str, cols: usize) -> &str {
    let mut used = 0usize;
    for (idx, g) in s.grapheme_indices(true) {
        let w = egc_width(g);
        if used + w > cols {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Truncate to `cols` then right-pad with spaces to exactly `cols` columns.
pub fn pad_right(s: &str, cols: usize) -> String {
    let head = truncate(s, cols);
    let mut out = String::with_capacity(cols.max(head.len()));
    out.push_str(head);
    let used = display_width(head);
    out.extend(std::iter::repeat_n(' ', cols.saturating_sub(used)));
    out
}

/// Center `s` in `cols` columns using `fill`. Text already at least `cols`
/// wide is returned unchanged. On odd margins the extra fill goes left only
/// when `cols` is odd as well, which keeps successive layouts stable.
pub fn center(s: &str, cols: usize, fill: char) -> String {
    let len = display_width(s);
    if len >= cols {
        return s.to_string();
    }
    let marg = cols - len;
    let left = marg / 2 + (marg & cols & 1);
    let right = marg - left;
    let mut out = String::with_capacity(s.len() + marg);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(s);
    out.extend(std::iter::repeat_n(fill, right));
    out
}
