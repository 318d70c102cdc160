//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given a seed and a sequence of inputs and
//! ticks, a session replays identically:
//! - Fixed timestep enemy/bullet tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod events;
pub mod grid;
pub mod mapgen;
pub mod movement;
pub mod notes;
pub mod scoring;
pub mod state;
pub mod tick;

pub use events::{EventSink, GameEvent};
pub use grid::{Grid, Tile, tile_of};
pub use mapgen::{GeneratedMap, generate_map};
pub use movement::{Direction, MovementMode, integrate, step};
pub use notes::NoteMap;
pub use scoring::{Score, ScoringPolicy, step_budget};
pub use state::{Bullet, Enemy, GamePhase, GameState, Player};
pub use tick::tick;
