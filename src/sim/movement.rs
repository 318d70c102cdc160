//! Player movement
//!
//! Two modes, picked per session:
//! - `Discrete`: one input event moves exactly one tile in one of 8 grid
//!   directions.
//! - `Continuous`: a held direction vector is integrated every frame,
//!   scaled by elapsed real time so speed does not depend on frame rate.
//!
//! Both fail closed (out-of-bounds or wall targets are rejected, never
//! clamped) and both route tile changes through `enter_tile`, which emits
//! exactly one crossing per distinct tile and resolves trap/goal/budget.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::grid::{Tile, tile_of};
use super::state::{GamePhase, GameState};
use crate::consts::NOMINAL_FRAME_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementMode {
    Discrete,
    #[default]
    Continuous,
}

/// Grid compass direction (north is -y, east is +x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn delta(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::NorthEast => IVec2::new(1, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::SouthEast => IVec2::new(1, 1),
            Direction::South => IVec2::new(0, 1),
            Direction::SouthWest => IVec2::new(-1, 1),
            Direction::West => IVec2::new(-1, 0),
            Direction::NorthWest => IVec2::new(-1, -1),
        }
    }

    /// Direction whose delta matches the signs of `v`; `None` for a zero vector
    pub fn from_vector(v: Vec2) -> Option<Self> {
        let delta = IVec2::new(sign(v.x), sign(v.y));
        Self::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

fn sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Discrete step. Returns true if the player moved.
pub fn step(state: &mut GameState, dir: Direction) -> bool {
    if !state.is_playing() {
        return false;
    }
    let target = state.player.tile() + dir.delta();
    if !state.grid.is_walkable(target) {
        return false;
    }
    state.player.pos = target.as_vec2();
    enter_tile(state, target);
    true
}

/// Continuous integration over `elapsed_ms` of real time.
///
/// `dir` is clamped to [-1, 1] per axis. The tentative position is
/// rejected as a whole if its tile is out of bounds or a wall; the player
/// does not slide along walls. Returns true if the player moved.
pub fn integrate(state: &mut GameState, dir: Vec2, elapsed_ms: f64) -> bool {
    if !state.is_playing() {
        return false;
    }
    let dir = dir.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    if dir == Vec2::ZERO || elapsed_ms <= 0.0 {
        return false;
    }

    let tuning = &state.config.tuning;
    let elapsed = elapsed_ms.min(tuning.max_frame_ms);
    let distance = tuning.move_speed * (elapsed / NOMINAL_FRAME_MS) as f32;
    let next = state.player.pos + dir * distance;

    if !state.grid.contains_point(next) || !state.grid.is_walkable(tile_of(next)) {
        return false;
    }

    state.player.pos = next;
    let tile = tile_of(next);
    if tile != state.player.last_tile {
        enter_tile(state, tile);
    }
    true
}

/// Resolve arrival on a new tile: crossing event and score first, then
/// trap, then goal, then an exhausted countdown budget.
fn enter_tile(state: &mut GameState, tile: IVec2) {
    state.player.last_tile = tile;
    let note = state.notes.note_at(tile);
    state.events.push(GameEvent::TileCrossed { tile, note });
    let exhausted = state.score.record_step();

    if state.grid.get(tile) == Some(Tile::Trap) {
        state.finish(GamePhase::Trapped);
    } else if tile == state.goal {
        state.finish(GamePhase::Won);
    } else if exhausted {
        state.finish(GamePhase::Lost);
    }
}
