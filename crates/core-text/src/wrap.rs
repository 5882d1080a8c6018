//! Greedy word wrapping.
//!
//! Behavior per call (one logical line in, zero or more display lines out):
//! * Tabs expand to 8-column stops, then every ASCII whitespace char becomes a
//!   plain space.
//! * The line is split into alternating runs of spaces and non-spaces, which
//!   are packed greedily into lines of at most `width` columns.
//! * Space runs are dropped at the start of every line except the first (so
//!   leading indentation survives) and at the end of every line.
//! * A word wider than `width` is split across lines at grapheme boundaries.
//! * Blank or whitespace-only input yields no lines; callers that need a
//!   placeholder row substitute an empty string.

use crate::width::{display_width, truncate};
use unicode_segmentation::UnicodeSegmentation;

const TAB_STOP: usize = 8;

/// Expand tabs to spaces using fixed 8-column stops.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for g in line.graphemes(true) {
        if g == "\t" {
            let pad = TAB_STOP - (col % TAB_STOP);
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else {
            out.push_str(g);
            col += display_width(g);
        }
    }
    out
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into logical lines on every line-break character, with `\r\n`
/// counted as one break. A trailing break does not start an extra line, so
/// empty text has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        out.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, n)| n == '\n') {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn is_space_char(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\u{0b}'
}

/// Split normalized text into runs of spaces and non-spaces.
fn chunks(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut prev_space: Option<bool> = None;
    for c in text.chars() {
        let space = c == ' ';
        match (prev_space, out.last_mut()) {
            (Some(p), Some(last)) if p == space => last.push(c),
            _ => out.push(c.to_string()),
        }
        prev_space = Some(space);
    }
    out
}

fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(|c| c == ' ')
}

/// Wrap a single line to `width` columns. A `width` of zero is treated as one.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let normalized: String = expand_tabs(line)
        .chars()
        .map(|c| if is_space_char(c) { ' ' } else { c })
        .collect();

    // Stack of pending chunks; the next chunk to place is at the end.
    let mut pending = chunks(&normalized);
    pending.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !pending.is_empty() {
        let mut cur: Vec<String> = Vec::new();
        let mut cur_len = 0usize;

        if !lines.is_empty() && pending.last().is_some_and(|c| is_blank(c)) {
            pending.pop();
        }

        while let Some(next) = pending.last() {
            let l = display_width(next);
            if cur_len + l > width {
                break;
            }
            cur_len += l;
            if let Some(chunk) = pending.pop() {
                cur.push(chunk);
            }
        }

        let overflowing = pending.last().is_some_and(|c| display_width(c) > width);
        if let Some(long) = pending.last_mut().filter(|_| overflowing) {
            let mut head = truncate(long, width - cur_len);
            if head.is_empty() && cur.is_empty() {
                // A single cluster wider than the whole line still has to make
                // progress.
                head = long.graphemes(true).next().unwrap_or("");
            }
            if !head.is_empty() {
                let head = head.to_string();
                let rest = long[head.len()..].to_string();
                cur.push(head);
                *long = rest;
                if long.is_empty() {
                    pending.pop();
                }
            }
        }

        if cur.last().is_some_and(|c| is_blank(c)) {
            cur.pop();
        }

        if !cur.is_empty() {
            lines.push(cur.concat());
        }
    }
    lines
}
