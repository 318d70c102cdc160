//! Survive - An isometric grid survival game
//!
//! Core modules:
//! - `sim`: Simulation (map generation, movement, enemies, bullets, game state)
//! - `game`: Frame driver tying clocks, input and persistence to the simulation
//! - `platform`: Browser/native platform abstraction (input, time)
//! - `persistence`: Key/value storage for score and preferences
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::{ConfigError, SessionConfig, Tuning};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Grid side is drawn once per process from this range
    pub const GRID_SIZE_MIN: i32 = 10;
    pub const GRID_SIZE_MAX: i32 = 20;

    /// Tile roll thresholds (wall checked first, then trap)
    pub const WALL_CHANCE: f32 = 0.05;
    pub const TRAP_CHANCE: f32 = 0.05;

    /// Enemy roster size per session
    pub const ENEMY_COUNT_MIN: u32 = 2;
    pub const ENEMY_COUNT_MAX: u32 = 5;
    /// Minimum Chebyshev distance between a spawning enemy and the player
    pub const SPAWN_CLEARANCE: i32 = 3;

    /// Enemy tick period in milliseconds (40 Hz)
    pub const ENEMY_TICK_MS: f64 = 25.0;
    /// Ticks between enemy wander steps
    pub const ENEMY_MOVE_INTERVAL: u32 = 15;
    /// First shot delay after spawn (ticks, min inclusive, max exclusive)
    pub const INITIAL_SHOT_DELAY: (u32, u32) = (30, 90);
    /// Reload period after a shot attempt (ticks)
    pub const RELOAD_TICKS: (u32, u32) = (60, 120);
    /// Enemies only fire at players closer than this
    pub const SHOOT_RANGE: f32 = 8.0;

    /// Bullet speed in tiles per enemy tick
    pub const BULLET_SPEED: f32 = 0.15;
    /// Bullet-to-player distance that counts as a hit
    pub const HIT_RADIUS: f32 = 0.5;

    /// Player speed in tiles per nominal frame
    pub const MOVE_SPEED: f32 = 0.15;
    /// Nominal frame duration the move speed is expressed against (60 fps)
    pub const NOMINAL_FRAME_MS: f64 = 16.67;
    /// Elapsed time per frame is clamped to this to prevent tunnelling
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum enemy ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Steps lost on being trapped or shot (cumulative scoring)
    pub const FAILURE_PENALTY: u32 = 30;
    /// Extra steps granted on top of the 1.5x distance budget (countdown scoring)
    pub const BUDGET_SLACK: u32 = 10;

    /// Bound on every rejection-sampling loop
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

    /// Joystick pointer offsets shorter than this (px) keep the previous direction
    pub const JOYSTICK_DEAD_ZONE: f32 = 3.0;
}

/// Map a screen-space direction onto the isometric grid axes.
///
/// Screen up is grid (-1,-1), screen right is grid (1,-1). The result is
/// clamped per axis so diagonals stay within the unit square, the same way
/// held keys are combined.
#[inline]
pub fn screen_to_grid(screen: Vec2) -> Vec2 {
    Vec2::new(screen.y + screen.x, screen.y - screen.x).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Chebyshev (king move) distance between two tiles
#[inline]
pub fn chebyshev(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().max_element()
}

/// Manhattan distance between two tiles
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    let d = (a - b).abs();
    (d.x + d.y) as u32
}
