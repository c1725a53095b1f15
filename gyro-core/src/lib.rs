//! Gyro Core Library - scene logic for the animated gyroscope
//!
//! This library holds everything that does not need a display: the frame
//! hierarchy and its toggles, key bindings, the animation tick and timer,
//! scene-graph composition, lighting, meshes and the camera.

pub mod animation;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod keymap;
pub mod lighting;
pub mod projection;
pub mod render;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationState, Jitter, Scheduler, Speed};
pub use command::{Command, Outcome};
pub use config::Config;
pub use error::{ConfigError, KeymapError};
pub use geometry::{Mesh, Primitive, Triangle, Vertex};
pub use input::{Key, KeyChord, KeyMap, Modifiers};
pub use lighting::{LightSource, Material, Rgb};
pub use projection::Camera;
pub use render::{DrawItem, MatrixStack, Part};
pub use scene::{FrameId, Scene};
pub use transform::{Axis, Frame, Space, Transform};
