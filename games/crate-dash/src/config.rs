use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matter.js-era tuning converted to per-second units: the original moved
/// bodies in pixels per 1/60 s step, so speeds are multiplied by 60.
const STEPS_PER_SECOND: f32 = 60.0;

/// Horizontal walking speed (px/s).
pub const BASE_SPEED: f32 = 5.0 * STEPS_PER_SECOND;
/// Upward speed given by a jump (px/s).
pub const JUMP_SPEED: f32 = 10.0 * STEPS_PER_SECOND;
/// Velocity imposed by a barrel hit (px/s, Y-down).
pub const KNOCKBACK: (f32, f32) = (-5.0 * STEPS_PER_SECOND, -5.0 * STEPS_PER_SECOND);
/// Gravity at factor 1.0 (px/s²).
pub const GRAVITY: f32 = 1000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{name} patrol bounds are inverted: min_x {min_x} >= max_x {max_x}")]
    InvertedPatrol { name: &'static str, min_x: f32, max_x: f32 },

    #[error("max_jumps must be at least 1")]
    NoJumps,
}

/// Scripted back-and-forth motion between two x bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub min_x: f32,
    pub max_x: f32,
    /// px/s
    pub speed: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            min_x: 700.0,
            max_x: 900.0,
            speed: 3.0 * STEPS_PER_SECOND,
        }
    }
}

/// Power-up tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub speed_multiplier: f32,
    /// Gravity factor while slow fall is active.
    pub slow_fall_gravity: f32,
    /// How long speed boost and slow fall last (seconds).
    pub duration_secs: f64,
    pub extra_time_secs: i32,
    /// How long the pickup banner stays up (seconds).
    pub banner_secs: f64,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.5,
            slow_fall_gravity: 0.5,
            duration_secs: 5.0,
            extra_time_secs: 10,
            banner_secs: 2.0,
        }
    }
}

/// Game tuning, loadable from JSON. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Viewport used before the page reports its real size.
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub gravity: f32,
    pub base_speed: f32,
    pub jump_speed: f32,
    pub max_jumps: u8,
    pub knockback_x: f32,
    pub knockback_y: f32,
    pub round_secs: i32,
    /// How far below the viewport the player may fall before respawning.
    pub fall_margin: f32,
    pub platform_fall_delay_secs: f64,
    pub power_ups: PowerUpConfig,
    pub car: PatrolConfig,
    pub barrel: PatrolConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            gravity: GRAVITY,
            base_speed: BASE_SPEED,
            jump_speed: JUMP_SPEED,
            max_jumps: 2,
            knockback_x: KNOCKBACK.0,
            knockback_y: KNOCKBACK.1,
            round_secs: 20,
            fall_margin: 100.0,
            platform_fall_delay_secs: 1.0,
            power_ups: PowerUpConfig::default(),
            car: PatrolConfig::default(),
            barrel: PatrolConfig {
                min_x: 250.0,
                max_x: 350.0,
                speed: 2.0 * STEPS_PER_SECOND,
            },
        }
    }
}

impl DashConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("viewport_width", self.viewport_width as f64),
            ("viewport_height", self.viewport_height as f64),
            ("gravity", self.gravity as f64),
            ("base_speed", self.base_speed as f64),
            ("jump_speed", self.jump_speed as f64),
            ("round_secs", self.round_secs as f64),
            ("platform_fall_delay_secs", self.platform_fall_delay_secs),
            ("power_ups.speed_multiplier", self.power_ups.speed_multiplier as f64),
            ("power_ups.slow_fall_gravity", self.power_ups.slow_fall_gravity as f64),
            ("power_ups.duration_secs", self.power_ups.duration_secs),
            ("power_ups.banner_secs", self.power_ups.banner_secs),
            ("car.speed", self.car.speed as f64),
            ("barrel.speed", self.barrel.speed as f64),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::NoJumps);
        }
        for (name, patrol) in [("car", &self.car), ("barrel", &self.barrel)] {
            if patrol.min_x >= patrol.max_x {
                return Err(ConfigError::InvertedPatrol {
                    name,
                    min_x: patrol.min_x,
                    max_x: patrol.max_x,
                });
            }
        }
        Ok(())
    }

    pub fn knockback(&self) -> glam::Vec2 {
        glam::Vec2::new(self.knockback_x, self.knockback_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tuning() {
        let config = DashConfig::default();
        assert_eq!(config.base_speed, 300.0);
        assert_eq!(config.jump_speed, 600.0);
        assert_eq!(config.round_secs, 20);
        assert_eq!(config.max_jumps, 2);
        assert_eq!(config.car.speed, 180.0);
        assert_eq!(config.barrel.speed, 120.0);
        assert_eq!(config.knockback(), glam::Vec2::new(-300.0, -300.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashConfig::from_json(r#"{ "round_secs": 45, "car": { "speed": 90.0 } }"#)
            .unwrap();
        assert_eq!(config.round_secs, 45);
        assert_eq!(config.car.speed, 90.0);
        assert_eq!(config.car.min_x, 700.0);
        assert_eq!(config.power_ups, PowerUpConfig::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = DashConfig::from_json("{ round_secs: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = DashConfig::from_json(r#"{ "gravity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "gravity", .. }), "{err}");
    }

    #[test]
    fn rejects_inverted_patrol() {
        let err = DashConfig::from_json(r#"{ "barrel": { "min_x": 400.0, "max_x": 300.0 } }"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "barrel patrol bounds are inverted: min_x 400 >= max_x 300"
        );
    }

    #[test]
    fn rejects_zero_jumps() {
        assert!(matches!(
            DashConfig::from_json(r#"{ "max_jumps": 0 }"#),
            Err(ConfigError::NoJumps)
        ));
    }
}
