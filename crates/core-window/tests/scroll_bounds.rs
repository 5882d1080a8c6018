use core_events::{KeyCode, KeyEvent};
use core_layout::Rect;
use core_window::{TextWindow, Window, WindowBehavior};
use proptest::prelude::*;

fn scroll_key() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::PageUp),
        Just(KeyCode::PageDown),
    ]
}

proptest! {
    // Scroll offset stays within [0, lines - visible] under any key sequence
    // and across resizes.
    #[test]
    fn scroll_never_leaves_valid_range(
        lines in 0usize..120,
        keys in prop::collection::vec(scroll_key(), 0..60),
        cols in 20u16..200,
        rows in 8u16..80,
    ) {
        let text = (0..lines).map(|i| format!("row {i}")).collect::<Vec<_>>().join("\n");
        let mut w = TextWindow::new(text, Window::new("P", Rect::screen(80, 24)));
        for key in &keys {
            w.handle_input(&KeyEvent::plain(*key));
            prop_assert!(w.scroll() <= w.max_scroll());
        }
        w.attach(Rect::screen(cols, rows));
        prop_assert!(w.scroll() <= w.max_scroll());
        prop_assert_eq!(
            w.max_scroll(),
            w.lines().len().saturating_sub(w.visible_height())
        );
    }

    // Outer size stays within 90% of the terminal and never below 10x6, for
    // empty text too; the window stays on screen.
    #[test]
    fn sized_window_respects_share_and_floor(
        lines in 0usize..200,
        width in 1usize..300,
        cols in 20u16..200,
        rows in 8u16..80,
    ) {
        let line = "x".repeat(width);
        let text = std::iter::repeat_n(line.as_str(), lines).collect::<Vec<_>>().join("\n");
        let w = TextWindow::new(text, Window::new("P", Rect::screen(cols, rows)));
        let outer = w.base().outer_rect();
        prop_assert!(outer.width <= (f64::from(cols) * 0.9) as i32);
        prop_assert!(outer.height <= (f64::from(rows) * 0.9) as i32);
        prop_assert!(outer.width >= 10 && outer.height >= 6);
        prop_assert!(outer.x >= 0 && outer.y >= 0);
        prop_assert!(outer.right() <= i32::from(cols));
        prop_assert!(outer.bottom() <= i32::from(rows));
    }
}

#[test]
fn pushing_fifty_lines_into_small_terminal_scrolls() {
    let text = (0..50).map(|i| format!("Line {i}")).collect::<Vec<_>>().join("\n");
    let mut w = TextWindow::new(text, Window::new("Scroll", Rect::screen(80, 24)));
    for _ in 0..100 {
        w.handle_input(&KeyEvent::plain(KeyCode::Down));
    }
    assert_eq!(w.scroll(), w.max_scroll());
    assert_eq!(w.lines().last().map(String::as_str), Some("Line 49"));
}
