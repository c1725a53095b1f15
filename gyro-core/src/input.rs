/// Key chords and the table that maps them to scene commands
use std::collections::HashMap;
use std::fmt;

use crate::animation::Speed;
use crate::command::Command;
use crate::scene::FrameId;
use crate::transform::{Axis, Space};

/// Distance moved by one translate key press
pub const MOVE_STEP: f32 = 0.25;
/// Angle turned by one rotate key press, in degrees
pub const TURN_STEP: f32 = 5.0;

/// A key independent of any terminal or windowing library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Esc,
    Enter,
    Tab,
    Backspace,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };
}

/// A key together with the modifiers held while pressing it.
///
/// For character keys the case carries shift, so `shift+l` and `L` are the
/// same chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    key: Key,
    modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        match key {
            Key::Char(c) if modifiers.shift => Self {
                key: Key::Char(c.to_ascii_uppercase()),
                modifiers: Modifiers {
                    shift: false,
                    ..modifiers
                },
            },
            _ => Self { key, modifiers },
        }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Esc => f.write_str("esc"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Backspace => f.write_str("backspace"),
            Key::F(n) => write!(f, "f{}", n),
        }
    }
}

/// Lookup table from key chords to commands
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeyChord, Command>,
}

fn translate(frame: FrameId, axis: Axis, space: Space, delta: f32) -> Command {
    Command::Translate {
        frame,
        axis,
        space,
        delta,
    }
}

fn rotate(frame: FrameId, axis: Axis, space: Space, degrees: f32) -> Command {
    Command::Rotate {
        frame,
        axis,
        space,
        degrees,
    }
}

impl KeyMap {
    /// A map with no bindings at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in controls
    pub fn standard() -> Self {
        let mut map = Self::empty();

        map.bind(KeyChord::plain(Key::Esc), Command::Quit);
        map.bind(KeyChord::new(Key::Char('c'), Modifiers::CTRL), Command::Quit);

        // World frame, moved along and about the eye's axes (the eye itself stays put)
        let world_moves = [
            ('w', Axis::Z, 1.0),
            ('s', Axis::Z, -1.0),
            ('a', Axis::X, 1.0),
            ('d', Axis::X, -1.0),
            ('r', Axis::Y, -1.0),
            ('f', Axis::Y, 1.0),
        ];
        for (c, axis, sign) in world_moves {
            map.bind(KeyChord::char(c), translate(FrameId::World, axis, Space::Parent, sign * MOVE_STEP));
        }
        let arrows = [
            (Key::Left, Axis::Y, -1.0),
            (Key::Right, Axis::Y, 1.0),
            (Key::Up, Axis::X, -1.0),
            (Key::Down, Axis::X, 1.0),
        ];
        for (key, axis, sign) in arrows {
            map.bind(KeyChord::plain(key), rotate(FrameId::World, axis, Space::Parent, sign * TURN_STEP));
        }
        map.bind(KeyChord::new(Key::Left, Modifiers::SHIFT), rotate(FrameId::World, Axis::Z, Space::Parent, TURN_STEP));
        map.bind(KeyChord::new(Key::Right, Modifiers::SHIFT), rotate(FrameId::World, Axis::Z, Space::Parent, -TURN_STEP));
        let ctrl_arrows = [
            (Key::Left, Axis::X, -1.0),
            (Key::Right, Axis::X, 1.0),
            (Key::Up, Axis::Y, 1.0),
            (Key::Down, Axis::Y, -1.0),
        ];
        for (key, axis, sign) in ctrl_arrows {
            map.bind(KeyChord::new(key, Modifiers::CTRL), translate(FrameId::World, axis, Space::Parent, sign * MOVE_STEP));
        }

        // Rings: a rotate pair and a translate pair each, shifted for the second axis
        let rings = [
            (FrameId::Outer, ['z', 'x'], ['g', 'h']),
            (FrameId::Middle, ['c', 'v'], ['y', 'u']),
            (FrameId::Inner, ['b', 'n'], ['i', 'o']),
        ];
        for (frame, [turn_neg, turn_pos], [move_neg, move_pos]) in rings {
            let shifted = |c: char| c.to_ascii_uppercase();
            map.bind(KeyChord::char(turn_neg), rotate(frame, Axis::Y, Space::Local, -TURN_STEP));
            map.bind(KeyChord::char(turn_pos), rotate(frame, Axis::Y, Space::Local, TURN_STEP));
            map.bind(KeyChord::char(shifted(turn_neg)), rotate(frame, Axis::X, Space::Local, -TURN_STEP));
            map.bind(KeyChord::char(shifted(turn_pos)), rotate(frame, Axis::X, Space::Local, TURN_STEP));
            map.bind(KeyChord::char(move_neg), translate(frame, Axis::X, Space::Local, -MOVE_STEP));
            map.bind(KeyChord::char(move_pos), translate(frame, Axis::X, Space::Local, MOVE_STEP));
            map.bind(KeyChord::char(shifted(move_neg)), translate(frame, Axis::Y, Space::Local, -MOVE_STEP));
            map.bind(KeyChord::char(shifted(move_pos)), translate(frame, Axis::Y, Space::Local, MOVE_STEP));
        }

        // Light positions on the number row
        let lights = [
            (FrameId::Light0, ['1', '2', '3', '4', '5', '6']),
            (FrameId::Light1, ['7', '8', '9', '0', '-', '=']),
        ];
        for (frame, keys) in lights {
            for (axis, pair) in Axis::ALL.into_iter().zip(keys.chunks(2)) {
                map.bind(KeyChord::char(pair[0]), translate(frame, axis, Space::Parent, -MOVE_STEP));
                map.bind(KeyChord::char(pair[1]), translate(frame, axis, Space::Parent, MOVE_STEP));
            }
        }

        map.bind(KeyChord::char('l'), Command::ToggleLight { index: 0 });
        map.bind(KeyChord::char('L'), Command::ToggleLight { index: 1 });
        map.bind(KeyChord::char('t'), Command::ToggleWireframe);
        map.bind(KeyChord::char(' '), Command::ToggleAnimation);
        map.bind(KeyChord::char('<'), Command::AdjustSpeed { delta: Speed::STEP });
        map.bind(KeyChord::char('>'), Command::AdjustSpeed { delta: -Speed::STEP });

        map
    }

    /// Bind `chord`, returning the command it replaced
    pub fn bind(&mut self, chord: KeyChord, command: Command) -> Option<Command> {
        self.bindings.insert(chord, command)
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<Command> {
        self.bindings.remove(chord)
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<&Command> {
        self.bindings.get(chord)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyChord, &Command)> {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_folds_into_char() {
        let shifted = KeyChord::new(Key::Char('l'), Modifiers::SHIFT);
        assert_eq!(shifted, KeyChord::char('L'));
        assert!(!shifted.modifiers().shift);

        let arrow = KeyChord::new(Key::Left, Modifiers::SHIFT);
        assert!(arrow.modifiers().shift);
    }

    #[test]
    fn test_standard_bindings() {
        let map = KeyMap::standard();
        assert_eq!(map.lookup(&KeyChord::plain(Key::Esc)), Some(&Command::Quit));
        assert_eq!(map.lookup(&KeyChord::char('l')), Some(&Command::ToggleLight { index: 0 }));
        assert_eq!(map.lookup(&KeyChord::char('L')), Some(&Command::ToggleLight { index: 1 }));
        assert_eq!(map.lookup(&KeyChord::char('t')), Some(&Command::ToggleWireframe));
        assert_eq!(map.lookup(&KeyChord::char(' ')), Some(&Command::ToggleAnimation));
        assert_eq!(
            map.lookup(&KeyChord::char('>')),
            Some(&Command::AdjustSpeed { delta: -Speed::STEP })
        );
        assert_eq!(map.lookup(&KeyChord::char('q')), None);
    }

    #[test]
    fn test_standard_ring_keys_target_their_ring() {
        let map = KeyMap::standard();
        let expect = [('x', FrameId::Outer), ('V', FrameId::Middle), ('o', FrameId::Inner)];
        for (c, ring) in expect {
            match map.lookup(&KeyChord::char(c)) {
                Some(Command::Rotate { frame, .. }) | Some(Command::Translate { frame, .. }) => {
                    assert_eq!(*frame, ring, "key {}", c)
                }
                other => panic!("key {} bound to {:?}", c, other),
            }
        }
    }

    #[test]
    fn test_every_number_key_moves_a_light() {
        let map = KeyMap::standard();
        for c in "1234567890-=".chars() {
            match map.lookup(&KeyChord::char(c)) {
                Some(Command::Translate { frame, .. }) => {
                    assert!(matches!(frame, FrameId::Light0 | FrameId::Light1))
                }
                other => panic!("key {} bound to {:?}", c, other),
            }
        }
    }

    #[test]
    fn test_world_keys_are_opposites() {
        let map = KeyMap::standard();
        for (a, b) in [('w', 's'), ('a', 'd'), ('r', 'f')] {
            let delta = |c: char| match map.lookup(&KeyChord::char(c)) {
                Some(Command::Translate { delta, frame: FrameId::World, .. }) => *delta,
                other => panic!("key {} bound to {:?}", c, other),
            };
            assert_eq!(delta(a), -delta(b));
        }
    }

    #[test]
    fn test_rebind_and_unbind() {
        let mut map = KeyMap::standard();
        let chord = KeyChord::char('q');
        assert_eq!(map.bind(chord, Command::Quit), None);
        assert_eq!(map.lookup(&chord), Some(&Command::Quit));
        assert_eq!(map.unbind(&chord), Some(Command::Quit));
        assert!(map.lookup(&chord).is_none());
    }

    #[test]
    fn test_chord_display() {
        assert_eq!(KeyChord::new(Key::Left, Modifiers::CTRL).to_string(), "ctrl+left");
        assert_eq!(KeyChord::char(' ').to_string(), "space");
        assert_eq!(KeyChord::char('L').to_string(), "L");
    }
}
