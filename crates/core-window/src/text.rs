use crate::{DEFAULT_STATUS, Window, WindowBehavior};
use anyhow::Result;
use core_events::{KeyCode, KeyEvent};
use core_layout::Dim;
use core_terminal::Surface;
use core_text::{display_width, pad_right, split_lines, wrap};

pub const SCROLL_STATUS: &str = "[Arrows/PgUp/PgDn=Scroll, Esc=Close]";

const MIN_WIDTH: i32 = 10;
const MIN_HEIGHT: i32 = 6;
/// Largest share of the terminal a text window sizes itself to.
const MAX_SHARE: f64 = 0.9;

/// Scrollable, self-sizing text window.
///
/// Invariant: `scroll <= max(0, lines.len() - visible_height)`.
#[derive(Debug)]
pub struct TextWindow {
    window: Window,
    text: String,
    lines: Vec<String>,
    scroll: usize,
}

impl TextWindow {
    /// Wrap `text` in `window`. The window's current terminal bounds are used
    /// for the first wrap.
    pub fn new(text: impl Into<String>, window: Window) -> Self {
        let mut tw = Self {
            window,
            text: text.into(),
            lines: Vec::new(),
            scroll: 0,
        };
        tw.handle_resize();
        tw
    }

    /// Join `lines` with `\n` and wrap them in `window`.
    pub fn from_lines<I, S>(lines: I, window: Window) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(text, window)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Wrapped display lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Jump to `scroll`, clamped to the valid range.
    pub fn set_scroll(&mut self, scroll: usize) {
        let clamped = scroll.min(self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.window.redraw = true;
        }
    }

    /// Rows available for text.
    pub fn visible_height(&self) -> usize {
        usize::try_from(self.window.content_rect().height).unwrap_or(0)
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.visible_height())
    }

    fn overflows(&self) -> bool {
        self.lines.len() > self.visible_height()
    }

    fn rewrap(&mut self) {
        let term = self.window.position.constraints;
        let offsets = self.window.content_offsets();
        let max_win_width = (f64::from(term.width) * MAX_SHARE) as i32;
        let max_win_height = (f64::from(term.height) * MAX_SHARE) as i32;
        let wrap_width = usize::try_from(max_win_width + offsets.width - 2).unwrap_or(0);

        let mut lines = Vec::new();
        let sources = split_lines(&self.text);
        if sources.is_empty() {
            lines.push(String::new());
        }
        for source in sources {
            let wrapped = wrap(source, wrap_width);
            if wrapped.is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(wrapped);
            }
        }

        let longest = lines
            .iter()
            .map(|l| i32::try_from(display_width(l)).unwrap_or(i32::MAX).saturating_add(2))
            .max()
            .unwrap_or(0);
        let count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        let width = (longest - offsets.width).min(max_win_width).max(MIN_WIDTH);
        let height = count.saturating_sub(offsets.height).min(max_win_height).max(MIN_HEIGHT);
        self.window.position.base.width = Some(Dim::Cells(width));
        self.window.position.base.height = Some(Dim::Cells(height));
        self.lines = lines;
        self.scroll = self.scroll.min(self.max_scroll());

        tracing::debug!(
            target: "window.text",
            source_bytes = self.text.len(),
            wrapped_lines = self.lines.len(),
            wrap_width,
            width,
            height,
            "rewrap"
        );
    }

    fn scroll_by(&mut self, key: KeyCode) -> bool {
        let page = self.visible_height();
        let max = self.max_scroll();
        let next = match key {
            KeyCode::Down => (self.scroll + 1).min(max),
            KeyCode::Up => self.scroll.saturating_sub(1),
            KeyCode::PageDown => (self.scroll + page).min(max),
            KeyCode::PageUp => self.scroll.saturating_sub(page),
            _ => return false,
        };
        if next != self.scroll {
            tracing::trace!(target: "window.text", from = self.scroll, to = next, "scroll");
            self.scroll = next;
            self.window.redraw = true;
        }
        true
    }
}

impl WindowBehavior for TextWindow {
    fn base(&self) -> &Window {
        &self.window
    }

    fn base_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let visible = self.visible_height();
        let total = self.lines.len();
        if total > visible {
            self.window.scroll_pos = Some(self.scroll as f64 / (total - visible) as f64);
            self.window.status_bar = SCROLL_STATUS.to_string();
        } else {
            self.window.scroll_pos = None;
            self.window.status_bar = DEFAULT_STATUS.to_string();
        }

        self.window.draw_chrome(surface)?;

        let content = self.window.content_rect();
        let cols = usize::try_from(content.width - 2).unwrap_or(0);
        for (row, y) in (content.y..).take(visible).enumerate() {
            let line = self
                .lines
                .get(self.scroll + row)
                .map(String::as_str)
                .unwrap_or("");
            surface.print_at(content.x + 1, y, &pad_right(line, cols))?;
        }
        surface.flush()
    }

    fn handle_input(&mut self, key: &KeyEvent) {
        if self.overflows() && self.scroll_by(key.code) {
            return;
        }
        self.window.handle_key(key);
    }

    fn handle_resize(&mut self) {
        self.window.resize_to_terminal();
        self.rewrap();
        self.window.redraw = true;
    }
}
