//! Periodic ring animation.
//!
//! The tick itself ([`step`]) is a pure function of the scene; timing lives
//! in [`Scheduler`], which plays the part of a self-rescheduling timer: it
//! is armed when the animation starts and re-armed by every tick that still
//! sees the animation running.

use std::fmt;
use std::time::Duration;

use nalgebra::Vector3;
use rand::Rng;

use crate::scene::{FrameId, Scene};
use crate::transform::{Axis, Transform};

/// Running state of the ring animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Stopped,
    Running,
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnimationState::Stopped => "stopped",
            AnimationState::Running => "running",
        })
    }
}

/// Ticks per full revolution of the outer ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u32);

impl Speed {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 360;
    pub const DEFAULT: u32 = 100;
    /// Change applied by one faster/slower key press
    pub const STEP: i32 = 10;

    pub fn new(ticks_per_turn: u32) -> Self {
        Self(ticks_per_turn.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn adjust(self, delta: i32) -> Self {
        let value = i64::from(self.0) + i64::from(delta);
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u32)
    }

    /// Per-tick rotation for a ring turning `ratio` times as often as the outer one
    pub fn degrees_per_tick(self, ratio: f32) -> f32 {
        360.0 / (self.0 as f32 * ratio)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Axis and period ratio of each ring's spin
const RING_SPIN: [(FrameId, Axis, f32); 3] = [
    (FrameId::Outer, Axis::Y, 1.0),
    (FrameId::Middle, Axis::X, 0.8),
    (FrameId::Inner, Axis::Y, 0.6),
];

/// Advance the rings by one tick.
///
/// Each ring's rotation is composed on the left of its current matrix and
/// the outer ring's jitter offset is replaced (or cleared once stopped).
pub fn step(scene: &Scene, jitter: Vector3<f32>) -> Scene {
    let mut next = scene.clone();
    let speed = scene.speed();
    for (ring, axis, ratio) in RING_SPIN {
        let spin = Transform::rotation(axis, speed.degrees_per_tick(ratio));
        next.frame_mut(ring).pre_multiply(&spin);
    }
    next.set_outer_jitter(if scene.is_animating() {
        jitter
    } else {
        Vector3::zeros()
    });
    next
}

/// Uniform random offset for the outer ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    amplitude: f32,
}

impl Jitter {
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude: amplitude.max(0.0),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f32> {
        if self.amplitude == 0.0 {
            return Vector3::zeros();
        }
        let a = self.amplitude;
        Vector3::new(rng.gen_range(-a..=a), rng.gen_range(-a..=a), rng.gen_range(-a..=a))
    }
}

/// Most ticks released by one `advance` call
pub const MAX_CATCH_UP: u32 = 3;

/// Fixed-period tick source
#[derive(Debug, Clone)]
pub struct Scheduler {
    period: Duration,
    accumulated: Duration,
    armed: bool,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            armed: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Schedule the next tick one period from now. Returns false when a
    /// tick was already pending, so a quick stop/start never runs two chains.
    pub fn arm(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        self.accumulated = Duration::ZERO;
        true
    }

    /// Let `elapsed` pass and return how many ticks became due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.armed {
            self.accumulated = Duration::ZERO;
            return 0;
        }
        self.accumulated += elapsed;
        let due = (self.accumulated.as_nanos() / self.period.as_nanos()) as u32;
        if due >= MAX_CATCH_UP {
            self.accumulated = Duration::ZERO;
            log::trace!("animation fell behind, dropping {} ticks", due - MAX_CATCH_UP);
            return MAX_CATCH_UP;
        }
        self.accumulated -= self.period * due;
        due
    }
}

/// Run every tick that became due during `elapsed`.
///
/// A tick only fires while the scheduler is armed; after rotating the rings
/// it re-arms the scheduler only if the animation is still running. Returns
/// the number of ticks applied.
pub fn fire<R: Rng + ?Sized>(
    scene: &mut Scene,
    scheduler: &mut Scheduler,
    elapsed: Duration,
    jitter: &Jitter,
    rng: &mut R,
) -> u32 {
    let due = scheduler.advance(elapsed);
    let mut fired = 0;
    for _ in 0..due {
        if !scheduler.armed {
            break;
        }
        *scene = step(scene, jitter.sample(rng));
        fired += 1;
        scheduler.armed = scene.is_animating();
    }
    if fired > 0 && !scheduler.armed {
        log::debug!("animation timer disarmed");
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK: Duration = Duration::from_millis(33);

    #[test]
    fn test_speed_is_clamped() {
        assert_eq!(Speed::new(0).get(), Speed::MIN);
        assert_eq!(Speed::new(1000).get(), Speed::MAX);
        assert_eq!(Speed::new(5).adjust(-100).get(), Speed::MIN);
        assert_eq!(Speed::new(355).adjust(Speed::STEP).get(), Speed::MAX);
    }

    #[test]
    fn test_default_ring_periods() {
        let speed = Speed::default();
        assert!((speed.degrees_per_tick(1.0) - 3.6).abs() < 1e-5);
        assert!((speed.degrees_per_tick(0.8) - 4.5).abs() < 1e-5);
        assert!((speed.degrees_per_tick(0.6) - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_step_rotates_rings_only() {
        let scene = Scene::new();
        let next = step(&scene, Vector3::zeros());
        for ring in FrameId::RINGS {
            assert_ne!(next.frame(ring), scene.frame(ring));
            assert!(next.frame(ring).is_rigid(1e-5));
        }
        for id in [FrameId::World, FrameId::Light0, FrameId::Light1] {
            assert_eq!(next.frame(id), scene.frame(id));
        }
    }

    #[test]
    fn test_step_keeps_jitter_off_when_stopped() {
        let scene = Scene::new();
        let next = step(&scene, Vector3::new(0.1, 0.1, 0.1));
        assert_eq!(next.outer_jitter(), Vector3::zeros());
    }

    #[test]
    fn test_jitter_within_amplitude() {
        let jitter = Jitter::new(0.05);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let offset = jitter.sample(&mut rng);
            assert!(offset.iter().all(|c| c.abs() <= 0.05));
        }
        assert_eq!(Jitter::new(0.0).sample(&mut rng), Vector3::zeros());
    }

    #[test]
    fn test_scheduler_counts_periods() {
        let mut scheduler = Scheduler::new(TICK);
        assert_eq!(scheduler.advance(TICK * 2), 0);
        assert!(scheduler.arm());
        assert!(!scheduler.arm());
        assert_eq!(scheduler.advance(TICK / 2), 0);
        assert_eq!(scheduler.advance(TICK / 2 - Duration::from_millis(1)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(TICK * 2), 2);
        assert_eq!(scheduler.advance(TICK * 50), MAX_CATCH_UP);
    }

    #[test]
    fn test_fire_rearms_while_running() {
        let mut scene = Scene::new();
        let mut scheduler = Scheduler::new(TICK);
        let jitter = Jitter::new(0.05);
        let mut rng = StdRng::seed_from_u64(1);

        scene.apply(&Command::ToggleAnimation);
        scheduler.arm();
        for _ in 0..10 {
            assert_eq!(fire(&mut scene, &mut scheduler, TICK, &jitter, &mut rng), 1);
        }
        assert!(scheduler.is_armed());
        assert_ne!(scene.outer_jitter(), Vector3::zeros());
    }

    #[test]
    fn test_stopped_scheduler_stays_idle() {
        let mut scene = Scene::new();
        let mut scheduler = Scheduler::new(TICK);
        let jitter = Jitter::new(0.05);
        let mut rng = StdRng::seed_from_u64(1);

        let before = scene.clone();
        assert_eq!(fire(&mut scene, &mut scheduler, TICK * 10, &jitter, &mut rng), 0);
        assert_eq!(scene, before);
    }
}
