//! Events emitted by the simulation for rendering/audio collaborators
//!
//! The simulation only decides *when* these fire. Hosts drain them from the
//! state after each frame and route them to an `EventSink`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player entered a new tile
    TileCrossed { tile: IVec2, note: u8 },
    Trapped,
    Won,
    Shot,
    /// Countdown budget ran out
    Lost,
    EnemyShoot { enemy_id: u32 },
}

impl GameEvent {
    /// Ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameEvent::Trapped | GameEvent::Won | GameEvent::Shot | GameEvent::Lost
        )
    }

    pub fn dispatch(&self, sink: &mut impl EventSink) {
        match *self {
            GameEvent::TileCrossed { tile, note } => sink.on_tile_crossed(tile, note),
            GameEvent::Trapped => sink.on_trapped(),
            GameEvent::Won => sink.on_won(),
            GameEvent::Shot => sink.on_shot(),
            GameEvent::Lost => sink.on_lost(),
            GameEvent::EnemyShoot { enemy_id } => sink.on_enemy_shoot(enemy_id),
        }
    }
}

/// Receiver for simulation events. Every method defaults to a no-op.
pub trait EventSink {
    fn on_tile_crossed(&mut self, _tile: IVec2, _note: u8) {}
    fn on_trapped(&mut self) {}
    fn on_won(&mut self) {}
    fn on_shot(&mut self) {}
    fn on_lost(&mut self) {}
    fn on_enemy_shoot(&mut self, _enemy_id: u32) {}
}

/// Sink that ignores everything
impl EventSink for () {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        crossings: Vec<IVec2>,
        shots_fired: u32,
        won: bool,
    }

    impl EventSink for Tally {
        fn on_tile_crossed(&mut self, tile: IVec2, _note: u8) {
            self.crossings.push(tile);
        }
        fn on_won(&mut self) {
            self.won = true;
        }
        fn on_enemy_shoot(&mut self, _enemy_id: u32) {
            self.shots_fired += 1;
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let events = [
            GameEvent::TileCrossed {
                tile: IVec2::new(1, 2),
                note: 48,
            },
            GameEvent::EnemyShoot { enemy_id: 4 },
            GameEvent::Trapped,
            GameEvent::Won,
        ];
        let mut tally = Tally::default();
        for event in &events {
            event.dispatch(&mut tally);
        }
        assert_eq!(tally.crossings, vec![IVec2::new(1, 2)]);
        assert_eq!(tally.shots_fired, 1);
        assert!(tally.won);
    }

    #[test]
    fn test_terminal_events() {
        assert!(GameEvent::Shot.is_terminal());
        assert!(!GameEvent::EnemyShoot { enemy_id: 1 }.is_terminal());
    }
}
