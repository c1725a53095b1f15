/// Translation from crossterm key events to terminal-independent chords
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gyro_core::{Key, KeyChord, Modifiers};

/// Chord for a key press, `None` for releases and keys the scene never binds
pub fn chord_from_event(event: &KeyEvent) -> Option<KeyChord> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => Key::Esc,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    let modifiers = Modifiers {
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    };

    Some(KeyChord::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_with_shift_matches_plain_uppercase() {
        let event = KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT);
        assert_eq!(chord_from_event(&event), Some(KeyChord::char('L')));
    }

    #[test]
    fn test_ctrl_arrow() {
        let event = KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL);
        assert_eq!(chord_from_event(&event), Some(KeyChord::new(Key::Up, Modifiers::CTRL)));
    }

    #[test]
    fn test_release_and_unknown_keys_are_dropped() {
        let mut release = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(chord_from_event(&release), None);

        let insert = KeyEvent::new(KeyCode::Insert, KeyModifiers::NONE);
        assert_eq!(chord_from_event(&insert), None);
    }
}
