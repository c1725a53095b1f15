/// Discrete scene edits produced by input dispatch
use std::fmt;

use crate::scene::FrameId;
use crate::transform::{Axis, Space};

/// One user-level action on the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Translate {
        frame: FrameId,
        axis: Axis,
        space: Space,
        delta: f32,
    },
    Rotate {
        frame: FrameId,
        axis: Axis,
        space: Space,
        degrees: f32,
    },
    ToggleLight {
        index: usize,
    },
    ToggleWireframe,
    ToggleAnimation,
    /// Change ticks per revolution; negative is faster
    AdjustSpeed {
        delta: i32,
    },
    Quit,
}

/// Written in the same form a bindings file uses
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Translate {
                frame,
                axis,
                space,
                delta,
            } => write!(f, "translate {} {} {} {}", frame, axis, space, delta),
            Command::Rotate {
                frame,
                axis,
                space,
                degrees,
            } => write!(f, "rotate {} {} {} {}", frame, axis, space, degrees),
            Command::ToggleLight { index } => write!(f, "toggle-light {}", index),
            Command::ToggleWireframe => f.write_str("toggle-wireframe"),
            Command::ToggleAnimation => f.write_str("toggle-animation"),
            Command::AdjustSpeed { delta } => write!(f, "speed {:+}", delta),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// What the caller should do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, draw a new frame
    Redraw,
    /// Animation switched to running, the tick scheduler must be armed
    Armed,
    Quit,
    /// The command referred to something that does not exist
    Ignored,
}
