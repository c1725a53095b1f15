/// Scene state: the gyroscope's frames, toggles and animation settings
use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::animation::{AnimationState, Speed};
use crate::command::{Command, Outcome};
use crate::config::Config;
use crate::transform::Frame;

/// Number of light sources in the scene
pub const LIGHT_COUNT: usize = 2;

/// Named node of the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameId {
    World,
    Outer,
    Middle,
    Inner,
    Light0,
    Light1,
}

impl FrameId {
    pub const ALL: [FrameId; 6] = [
        FrameId::World,
        FrameId::Outer,
        FrameId::Middle,
        FrameId::Inner,
        FrameId::Light0,
        FrameId::Light1,
    ];

    /// Ring frames in nesting order
    pub const RINGS: [FrameId; 3] = [FrameId::Outer, FrameId::Middle, FrameId::Inner];

    fn index(self) -> usize {
        self as usize
    }

    /// Parent node, `None` for frames hanging off the eye (root)
    pub fn parent(self) -> Option<FrameId> {
        match self {
            FrameId::World | FrameId::Light0 | FrameId::Light1 => None,
            FrameId::Outer => Some(FrameId::World),
            FrameId::Middle => Some(FrameId::Outer),
            FrameId::Inner => Some(FrameId::Middle),
        }
    }

    pub fn light(index: usize) -> Option<FrameId> {
        match index {
            0 => Some(FrameId::Light0),
            1 => Some(FrameId::Light1),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameId::World => "world",
            FrameId::Outer => "outer",
            FrameId::Middle => "middle",
            FrameId::Inner => "inner",
            FrameId::Light0 => "light0",
            FrameId::Light1 => "light1",
        }
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("unknown frame `{}`", s))
    }
}

/// Everything that changes while the program runs
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    frames: [Frame; 6],
    lights_enabled: [bool; LIGHT_COUNT],
    wireframe: bool,
    animation: AnimationState,
    speed: Speed,
    outer_jitter: Vector3<f32>,
}

impl Scene {
    pub fn new() -> Self {
        let mut frames = [Frame::identity(); 6];
        frames[FrameId::Light0.index()] = Frame::from_translation(-0.2, 0.5, 0.2);
        frames[FrameId::Light1.index()] = Frame::from_translation(6.0, 0.2, 0.0);

        Self {
            frames,
            lights_enabled: [true; LIGHT_COUNT],
            wireframe: false,
            animation: AnimationState::Stopped,
            speed: Speed::default(),
            outer_jitter: Vector3::zeros(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut scene = Self::new();
        scene.speed = Speed::new(config.speed);
        scene.wireframe = config.wireframe;
        if config.animate {
            scene.animation = AnimationState::Running;
        }
        scene
    }

    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.index()]
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.index()]
    }

    pub fn light_enabled(&self, index: usize) -> bool {
        self.lights_enabled.get(index).copied().unwrap_or(false)
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn is_animating(&self) -> bool {
        self.animation == AnimationState::Running
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Offset composed right after the outer ring's frame
    pub fn outer_jitter(&self) -> Vector3<f32> {
        self.outer_jitter
    }

    pub(crate) fn set_outer_jitter(&mut self, offset: Vector3<f32>) {
        self.outer_jitter = offset;
    }

    /// Apply one command and report what the caller has to do next
    pub fn apply(&mut self, command: &Command) -> Outcome {
        log::debug!("apply {:?}", command);
        match *command {
            Command::Translate {
                frame,
                axis,
                space,
                delta,
            } => {
                self.frame_mut(frame).translate(axis, delta, space);
                Outcome::Redraw
            }
            Command::Rotate {
                frame,
                axis,
                space,
                degrees,
            } => {
                self.frame_mut(frame).rotate(axis, degrees, space);
                Outcome::Redraw
            }
            Command::ToggleLight { index } => match self.lights_enabled.get_mut(index) {
                Some(enabled) => {
                    *enabled = !*enabled;
                    log::info!("light {} {}", index, if *enabled { "on" } else { "off" });
                    Outcome::Redraw
                }
                None => {
                    log::warn!("no light with index {}", index);
                    Outcome::Ignored
                }
            },
            Command::ToggleWireframe => {
                self.wireframe = !self.wireframe;
                Outcome::Redraw
            }
            Command::ToggleAnimation => match self.animation {
                AnimationState::Stopped => {
                    self.animation = AnimationState::Running;
                    log::info!("animation running");
                    Outcome::Armed
                }
                AnimationState::Running => {
                    self.animation = AnimationState::Stopped;
                    self.outer_jitter = Vector3::zeros();
                    log::info!("animation stopped");
                    Outcome::Redraw
                }
            },
            Command::AdjustSpeed { delta } => {
                self.speed = self.speed.adjust(delta);
                log::debug!("speed now {} ticks per turn", self.speed.get());
                Outcome::Redraw
            }
            Command::Quit => Outcome::Quit,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
