/// Parser for key binding files.
///
/// One binding per line, `chord = action`:
///
/// ```text
/// # comments start the line
/// shift+left = rotate world z parent 5
/// q          = quit
/// ctrl+t     = toggle-light 1
/// >          = speed -20
/// space      = unbind
/// ```
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, char, digit1, one_of, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize, value, verify},
    multi::many0,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::command::Command;
use crate::error::KeymapError;
use crate::input::{Key, KeyChord, KeyMap, Modifiers};
use crate::scene::{FrameId, LIGHT_COUNT};
use crate::transform::{Axis, Space};

/// One parsed line: a chord and the command to bind, or `None` to unbind
pub type Binding = (KeyChord, Option<Command>);

#[derive(Debug, Clone, Copy)]
enum Modifier {
    Shift,
    Ctrl,
    Alt,
}

/// Parse a whole bindings file
pub fn parse_bindings(input: &str) -> Result<Vec<Binding>, KeymapError> {
    let mut bindings = Vec::new();
    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (_, binding) = all_consuming(terminated(parse_line, space0))(line).map_err(|_| {
            KeymapError::Syntax {
                line: number + 1,
                text: line.to_string(),
            }
        })?;
        if let Some(Command::ToggleLight { index }) = binding.1 {
            if index >= LIGHT_COUNT {
                return Err(KeymapError::UnknownLight {
                    line: number + 1,
                    index,
                });
            }
        }
        bindings.push(binding);
    }
    Ok(bindings)
}

impl KeyMap {
    /// Apply a bindings file on top of this map, returning how many lines took effect
    pub fn merge(&mut self, input: &str) -> Result<usize, KeymapError> {
        let bindings = parse_bindings(input)?;
        for (chord, command) in &bindings {
            match command {
                Some(command) => {
                    if let Some(old) = self.bind(*chord, *command) {
                        log::debug!("{} rebound from {:?} to {:?}", chord, old, command);
                    }
                }
                None => {
                    if self.unbind(chord).is_none() {
                        log::warn!("{} was not bound", chord);
                    }
                }
            }
        }
        Ok(bindings.len())
    }

    /// Every binding as a bindings file, one sorted line per chord
    pub fn to_bindings(&self) -> String {
        let mut lines: Vec<String> = self
            .iter()
            .map(|(chord, command)| format!("{} = {}", chord, command))
            .collect();
        lines.sort();
        lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

fn parse_line(input: &str) -> IResult<&str, Binding> {
    let (input, chord) = parse_chord(input)?;
    let (input, _) = tuple((space0, char('='), space0))(input)?;
    let (input, command) = alt((value(None, tag("unbind")), map(parse_command, Some)))(input)?;
    Ok((input, (chord, command)))
}

fn parse_modifier(input: &str) -> IResult<&str, Modifier> {
    terminated(
        alt((
            value(Modifier::Shift, tag("shift")),
            value(Modifier::Ctrl, tag("ctrl")),
            value(Modifier::Alt, tag("alt")),
        )),
        char('+'),
    )(input)
}

fn parse_key(input: &str) -> IResult<&str, Key> {
    alt((
        value(Key::Left, tag("left")),
        value(Key::Right, tag("right")),
        value(Key::Up, tag("up")),
        value(Key::Down, tag("down")),
        value(Key::Esc, tag("esc")),
        value(Key::Enter, tag("enter")),
        value(Key::Tab, tag("tab")),
        value(Key::Backspace, tag("backspace")),
        value(Key::Char(' '), tag("space")),
        map_res(preceded(char('f'), digit1), |n: &str| n.parse::<u8>().map(Key::F)),
        map(anychar, Key::Char),
    ))(input)
}

fn parse_chord(input: &str) -> IResult<&str, KeyChord> {
    let (input, modifiers) = many0(parse_modifier)(input)?;
    let (input, key) = parse_key(input)?;
    let mods = modifiers.iter().fold(Modifiers::NONE, |mut acc, m| {
        match m {
            Modifier::Shift => acc.shift = true,
            Modifier::Ctrl => acc.ctrl = true,
            Modifier::Alt => acc.alt = true,
        }
        acc
    });
    Ok((input, KeyChord::new(key, mods)))
}

fn parse_frame(input: &str) -> IResult<&str, FrameId> {
    alt((
        value(FrameId::World, tag("world")),
        value(FrameId::Outer, tag("outer")),
        value(FrameId::Middle, tag("middle")),
        value(FrameId::Inner, tag("inner")),
        value(FrameId::Light0, tag("light0")),
        value(FrameId::Light1, tag("light1")),
    ))(input)
}

fn parse_axis(input: &str) -> IResult<&str, Axis> {
    alt((
        value(Axis::X, char('x')),
        value(Axis::Y, char('y')),
        value(Axis::Z, char('z')),
    ))(input)
}

fn parse_space(input: &str) -> IResult<&str, Space> {
    alt((
        value(Space::Local, tag("local")),
        value(Space::Parent, tag("parent")),
    ))(input)
}

fn parse_signed(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), str::parse::<i32>)(input)
}

/// `FRAME AXIS [SPACE] AMOUNT` after a motion verb
fn parse_motion(input: &str) -> IResult<&str, (FrameId, Axis, Space, f32)> {
    let (input, frame) = preceded(space1, parse_frame)(input)?;
    let (input, axis) = preceded(space1, parse_axis)(input)?;
    let (input, space) = opt(preceded(space1, parse_space))(input)?;
    // nan, inf and values past f32::MAX would wreck the frame matrix
    let (input, amount) = preceded(space1, verify(float, |v: &f32| v.is_finite()))(input)?;
    Ok((input, (frame, axis, space.unwrap_or_default(), amount)))
}

fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        value(Command::Quit, tag("quit")),
        value(Command::ToggleWireframe, tag("toggle-wireframe")),
        value(Command::ToggleAnimation, tag("toggle-animation")),
        map(
            preceded(pair(tag("toggle-light"), space1), map_res(digit1, str::parse::<usize>)),
            |index| Command::ToggleLight { index },
        ),
        map(preceded(pair(tag("speed"), space1), parse_signed), |delta| {
            Command::AdjustSpeed { delta }
        }),
        map(preceded(tag("translate"), parse_motion), |(frame, axis, space, delta)| {
            Command::Translate {
                frame,
                axis,
                space,
                delta,
            }
        }),
        map(preceded(tag("rotate"), parse_motion), |(frame, axis, space, degrees)| {
            Command::Rotate {
                frame,
                axis,
                space,
                degrees,
            }
        }),
    ))(input)
}
