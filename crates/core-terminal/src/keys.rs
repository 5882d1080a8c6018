use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into the normalized `KeyEvent`.
///
/// Returns `None` for releases and for key codes windows never act on
/// (media keys, lock keys, bare modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    Some(KeyEvent::new(code, map_mods(event.modifiers)))
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::F(n) => KeyCode::F(*n),
        // lock keys, media keys, bare modifiers
        _ => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(CKeyCode::Char('a'), CKeyModifiers::NONE, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("char should map");
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(key.mods.is_empty());
    }

    #[test]
    fn maps_scroll_keys() {
        for (raw, expected) in [
            (CKeyCode::Up, KeyCode::Up),
            (CKeyCode::Down, KeyCode::Down),
            (CKeyCode::PageUp, KeyCode::PageUp),
            (CKeyCode::PageDown, KeyCode::PageDown),
            (CKeyCode::Esc, KeyCode::Esc),
            (CKeyCode::Enter, KeyCode::Enter),
        ] {
            let ev = key_event(raw, CKeyModifiers::NONE, CKeyEventKind::Press);
            assert_eq!(map_key_event(&ev).map(|k| k.code), Some(expected));
        }
    }

    #[test]
    fn maps_ctrl_c_as_interrupt() {
        let ev = key_event(CKeyCode::Char('c'), CKeyModifiers::CONTROL, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("ctrl-c should map");
        assert!(key.is_interrupt());
    }

    #[test]
    fn repeats_map_and_releases_are_dropped() {
        let repeat = key_event(CKeyCode::Down, CKeyModifiers::NONE, CKeyEventKind::Repeat);
        assert!(map_key_event(&repeat).is_some());
        let release = key_event(CKeyCode::Down, CKeyModifiers::NONE, CKeyEventKind::Release);
        assert!(map_key_event(&release).is_none());
    }

    #[test]
    fn unsupported_keys_return_none() {
        let ev = key_event(CKeyCode::CapsLock, CKeyModifiers::NONE, CKeyEventKind::Press);
        assert!(map_key_event(&ev).is_none());
    }
}
