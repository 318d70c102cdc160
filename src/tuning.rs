//! Data-driven game balance
//!
//! Every number the simulation uses lives in `Tuning`. Defaults come from
//! `crate::consts`; a host may override them (e.g. from JSON) and must run
//! `validate` before handing them to a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{MovementMode, ScoringPolicy};

/// Largest grid side a session accepts
pub const MAX_GRID_SIZE: i32 = 256;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size {0} is outside 1..=256")]
    GridSize(i32),
    #[error("{name} chance {value} is outside [0, 1]")]
    Chance { name: &'static str, value: f32 },
    #[error("wall chance + trap chance exceeds 1 ({0})")]
    ChanceSum(f32),
    #[error("{name} range {min}..{max} is empty")]
    EmptyRange { name: &'static str, min: u32, max: u32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// A single integration step would jump over whole tiles
    #[error("{name} covers {per_step} per step, must stay below {limit}")]
    TooFast {
        name: &'static str,
        per_step: f64,
        limit: f64,
    },
}

/// Simulation balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Grid side range (inclusive) used when the session does not fix one
    pub grid_size_range: (i32, i32),
    pub wall_chance: f32,
    pub trap_chance: f32,
    /// Enemy roster size (inclusive)
    pub enemy_count: (u32, u32),
    pub spawn_clearance: i32,
    pub enemy_tick_ms: f64,
    pub enemy_move_interval: u32,
    /// First shot delay (min inclusive, max exclusive)
    pub initial_shot_delay: (u32, u32),
    /// Reload period (min inclusive, max exclusive)
    pub reload_ticks: (u32, u32),
    pub shoot_range: f32,
    pub bullet_speed: f32,
    pub hit_radius: f32,
    pub move_speed: f32,
    pub max_frame_ms: f64,
    pub failure_penalty: u32,
    pub budget_slack: u32,
    pub max_placement_attempts: u32,
    pub joystick_dead_zone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size_range: (GRID_SIZE_MIN, GRID_SIZE_MAX),
            wall_chance: WALL_CHANCE,
            trap_chance: TRAP_CHANCE,
            enemy_count: (ENEMY_COUNT_MIN, ENEMY_COUNT_MAX),
            spawn_clearance: SPAWN_CLEARANCE,
            enemy_tick_ms: ENEMY_TICK_MS,
            enemy_move_interval: ENEMY_MOVE_INTERVAL,
            initial_shot_delay: INITIAL_SHOT_DELAY,
            reload_ticks: RELOAD_TICKS,
            shoot_range: SHOOT_RANGE,
            bullet_speed: BULLET_SPEED,
            hit_radius: HIT_RADIUS,
            move_speed: MOVE_SPEED,
            max_frame_ms: MAX_FRAME_MS,
            failure_penalty: FAILURE_PENALTY,
            budget_slack: BUDGET_SLACK,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            joystick_dead_zone: JOYSTICK_DEAD_ZONE,
        }
    }
}

impl Tuning {
    /// Check every knob is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.grid_size_range;
        check_grid_size(lo)?;
        check_grid_size(hi)?;
        if lo > hi {
            return Err(ConfigError::EmptyRange {
                name: "grid size",
                min: lo as u32,
                max: hi as u32,
            });
        }

        for (name, value) in [("wall", self.wall_chance), ("trap", self.trap_chance)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Chance { name, value });
            }
        }
        let sum = self.wall_chance + self.trap_chance;
        if sum > 1.0 {
            return Err(ConfigError::ChanceSum(sum));
        }

        let (min, max) = self.enemy_count;
        if min > max {
            return Err(ConfigError::EmptyRange { name: "enemy count", min, max });
        }
        for (name, (min, max)) in [
            ("initial shot delay", self.initial_shot_delay),
            ("reload", self.reload_ticks),
        ] {
            if min >= max {
                return Err(ConfigError::EmptyRange { name, min, max });
            }
        }

        for (name, value) in [
            ("enemy tick", self.enemy_tick_ms),
            ("enemy move interval", self.enemy_move_interval as f64),
            ("bullet speed", self.bullet_speed as f64),
            ("hit radius", self.hit_radius as f64),
            ("move speed", self.move_speed as f64),
            ("max frame", self.max_frame_ms),
            ("placement attempts", self.max_placement_attempts as f64),
        ] {
            if value <= 0.0 || value.is_nan() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        // Collision only inspects the destination tile, so no step may
        // reach past a neighbouring tile. Bullets must also not step over
        // the hit circle.
        let player_step = self.move_speed as f64 * self.max_frame_ms / NOMINAL_FRAME_MS;
        let bullet_limit = (2.0 * self.hit_radius as f64).min(1.0);
        for (name, per_step, limit) in [
            ("move speed", player_step, 1.0),
            ("bullet speed", self.bullet_speed as f64, bullet_limit),
        ] {
            if per_step >= limit {
                return Err(ConfigError::TooFast { name, per_step, limit });
            }
        }
        Ok(())
    }
}

fn check_grid_size(size: i32) -> Result<(), ConfigError> {
    if (1..=MAX_GRID_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ConfigError::GridSize(size))
    }
}

/// Everything fixed at session start
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed grid side; drawn from `tuning.grid_size_range` when `None`
    pub grid_size: Option<i32>,
    pub movement: MovementMode,
    pub scoring: ScoringPolicy,
    pub tuning: Tuning,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.grid_size {
            check_grid_size(size)?;
        }
        self.tuning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_chances() {
        let tuning = Tuning {
            wall_chance: 0.7,
            trap_chance: 0.6,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::ChanceSum(_))));

        let tuning = Tuning {
            trap_chance: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Chance { name: "trap", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_ranges_and_zero_speeds() {
        let tuning = Tuning {
            reload_ticks: (60, 60),
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::EmptyRange { .. })));

        let tuning = Tuning {
            bullet_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositive { name: "bullet speed", .. })
        ));
    }

    #[test]
    fn test_rejects_speeds_that_skip_tiles() {
        // 0.5 per nominal frame over a 100ms frame is about 3 tiles
        let tuning = Tuning {
            move_speed: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::TooFast { name: "move speed", .. })
        ));

        let tuning = Tuning {
            bullet_speed: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::TooFast { name: "bullet speed", .. })
        ));

        // A small hit circle tightens the bullet limit
        let tuning = Tuning {
            bullet_speed: 0.5,
            hit_radius: 0.2,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::TooFast { name: "bullet speed", .. })
        ));

        // A shorter frame clamp makes a faster player safe again
        let tuning = Tuning {
            move_speed: 0.5,
            max_frame_ms: 30.0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_grid_size() {
        let config = SessionConfig {
            grid_size: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridSize(0)));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"bullet_speed": 0.3}"#).unwrap();
        assert_eq!(tuning.bullet_speed, 0.3);
        assert_eq!(tuning.hit_radius, HIT_RADIUS);
    }
}
