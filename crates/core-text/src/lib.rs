//! Text measurement and wrapping for window chrome and text windows.
//!
//! All widths are terminal display columns, computed per grapheme cluster so
//! wide (CJK, emoji) clusters count as two cells and combining sequences are
//! never split.

pub mod width;
pub mod wrap;

pub use width::{center, display_width, egc_width, pad_right, truncate};
pub use wrap::{expand_tabs, split_lines, wrap};
