//! Start-up configuration shared by every front end

use std::time::Duration;

use crate::animation::Speed;
use crate::error::ConfigError;

pub const MAX_FPS: u32 = 120;

/// Start-up options for a gyroscope session
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Animation ticks per second
    pub fps: u32,
    /// Ticks per outer-ring revolution
    pub speed: u32,
    /// Half-width of the outer ring's per-tick jitter, 0 disables it
    pub jitter: f32,
    /// Fixed seed for the jitter generator
    pub seed: Option<u64>,
    pub wireframe: bool,
    /// Start with the animation running
    pub animate: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::Fps {
                value: self.fps,
                max: MAX_FPS,
            });
        }
        if self.speed < Speed::MIN || self.speed > Speed::MAX {
            return Err(ConfigError::Speed {
                value: self.speed,
                min: Speed::MIN,
                max: Speed::MAX,
            });
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(ConfigError::Jitter(self.jitter));
        }
        Ok(())
    }

    /// Nominal time between animation ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            speed: Speed::DEFAULT,
            jitter: 0.05,
            seed: None,
            wireframe: false,
            animate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_period(), Duration::from_millis(33));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = Config {
            fps: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Fps { value: 0, max: MAX_FPS }));

        let config = Config {
            speed: 361,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Speed { value: 361, .. })));

        let config = Config {
            jitter: f32::NAN,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Jitter(_))));
    }
}
