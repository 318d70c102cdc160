//! Frame driver
//!
//! `Game` owns one `GameState` plus everything a host needs around it: the
//! held-input state, the frame clock, the fixed enemy tick accumulator and
//! the persistence store. Hosts forward input events as they arrive and
//! call `frame` once per display refresh.

use glam::Vec2;

use crate::consts::MAX_SUBSTEPS;
use crate::persistence::{self, Storage};
use crate::platform::{FixedStep, FrameClock, Joystick, Key, KeyboardState};
use crate::sim::{GameEvent, GameState, MovementMode, ScoringPolicy, integrate, step, tick};
use crate::tuning::{ConfigError, SessionConfig};

pub struct Game<S: Storage> {
    state: GameState,
    storage: S,
    keyboard: KeyboardState,
    joystick: Joystick,
    clock: FrameClock,
    enemy_step: FixedStep,
    sound_enabled: bool,
    /// Last score value written to storage
    saved_score: u32,
}

impl<S: Storage> Game<S> {
    /// Start the first session, seeding the cumulative score from storage
    pub fn new(config: SessionConfig, seed: u64, storage: S) -> Result<Self, ConfigError> {
        let steps_done = persistence::load_score(&storage);
        let sound_enabled = persistence::load_sound_pref(&storage);
        let tuning = config.tuning.clone();
        let state = GameState::new(config, seed, steps_done)?;

        log::info!(
            "Game created: seed {}, {:?} movement, {:?} scoring, {} steps done",
            seed,
            state.config.movement,
            state.config.scoring,
            steps_done
        );

        Ok(Self {
            state,
            storage,
            keyboard: KeyboardState::default(),
            joystick: Joystick::new(tuning.joystick_dead_zone),
            clock: FrameClock::new(tuning.max_frame_ms),
            enemy_step: FixedStep::new(tuning.enemy_tick_ms, MAX_SUBSTEPS),
            sound_enabled,
            saved_score: steps_done,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Flip and persist the sound preference; returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        persistence::save_sound_pref(&mut self.storage, self.sound_enabled);
        log::info!("Sound {}", if self.sound_enabled { "on" } else { "off" });
        self.sound_enabled
    }

    pub fn key_down(&mut self, key: Key) {
        if key == Key::Reset {
            self.reset();
            return;
        }
        match self.state.config.movement {
            MovementMode::Discrete => {
                if let Some(dir) = key.direction() {
                    step(&mut self.state, dir);
                    self.persist_score();
                }
            }
            MovementMode::Continuous => self.keyboard.key_down(key),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keyboard.key_up(key);
    }

    /// Joystick press at `offset` (screen px from the stick centre)
    pub fn joystick_begin(&mut self, offset: Vec2) {
        self.joystick.begin(offset);
    }

    pub fn joystick_move(&mut self, offset: Vec2) {
        self.joystick.move_to(offset);
    }

    pub fn joystick_end(&mut self) {
        self.joystick.end();
    }

    /// Current continuous input direction in grid space
    pub fn input_direction(&mut self) -> Vec2 {
        if self.joystick.is_active() {
            self.joystick.sample()
        } else {
            self.keyboard.direction()
        }
    }

    /// Advance to host time `now_ms`: player movement, then enemy ticks.
    /// Returns the events raised since the previous frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let elapsed = self.clock.advance(now_ms);

        if self.state.config.movement == MovementMode::Continuous {
            let dir = self.input_direction();
            integrate(&mut self.state, dir, elapsed);
        }

        for _ in 0..self.enemy_step.advance(elapsed) {
            tick(&mut self.state);
        }

        self.persist_score();
        self.state.drain_events()
    }

    /// Start a new session. Pending enemy ticks and undelivered events from
    /// the old session are dropped.
    pub fn reset(&mut self) {
        self.state.reset();
        self.enemy_step.reset();
        self.keyboard.clear();
        self.joystick.end();
        self.persist_score();
    }

    /// JSON snapshot of the session for an external renderer
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.state)
    }

    /// Write the cumulative score if it changed since the last write
    fn persist_score(&mut self) {
        let score = self.state.score;
        if score.policy == ScoringPolicy::Cumulative && score.value != self.saved_score {
            persistence::save_score(&mut self.storage, score.value);
            self.saved_score = score.value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    use crate::persistence::{MemoryStorage, SCORE_KEY, SOUND_KEY, load_score, save_score};
    use crate::sim::{GamePhase, Tile};

    fn config(movement: MovementMode) -> SessionConfig {
        SessionConfig {
            grid_size: Some(12),
            movement,
            ..Default::default()
        }
    }

    #[test]
    fn test_score_loaded_from_storage() {
        let mut storage = MemoryStorage::new();
        storage.set_item(SCORE_KEY, "250");
        storage.set_item(SOUND_KEY, "false");
        let game = Game::new(config(MovementMode::Continuous), 1, storage).unwrap();
        assert_eq!(game.state().score.value, 250);
        assert!(!game.sound_enabled());
    }

    #[test]
    fn test_toggle_sound_persists() {
        let mut game = Game::new(config(MovementMode::Continuous), 1, MemoryStorage::new()).unwrap();
        assert!(game.sound_enabled());
        assert!(!game.toggle_sound());
        assert_eq!(game.storage().get_item(SOUND_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_enemy_ticks_follow_wall_clock() {
        let mut game = Game::new(config(MovementMode::Continuous), 5, MemoryStorage::new()).unwrap();
        game.frame(0.0);
        for i in 1..=40 {
            game.frame(i as f64 * 25.0);
            if !game.state().is_playing() {
                return;
            }
        }
        assert_eq!(game.state().time_ticks, 40);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut game = Game::new(config(MovementMode::Continuous), 5, MemoryStorage::new()).unwrap();
        game.frame(0.0);
        game.frame(60_000.0);
        // 100ms clamp at 25ms per tick
        assert!(game.state().time_ticks <= 4);
    }

    #[test]
    fn test_discrete_key_steps_once() {
        let mut game = Game::new(config(MovementMode::Discrete), 8, MemoryStorage::new()).unwrap();
        let before = game.state().player.pos;
        game.key_down(Key::C);
        game.key_up(Key::C);
        let after = game.state().player.pos;
        if after != before {
            assert_eq!(after - before, Vec2::new(1.0, 0.0));
            assert_eq!(load_score(game.storage()), game.state().score.value);
        }
        // Held state is ignored in discrete mode
        game.frame(0.0);
        game.frame(16.0);
        assert_eq!(game.state().player.pos, after);
    }

    #[test]
    fn test_reset_key_starts_new_session() {
        let mut game = Game::new(config(MovementMode::Continuous), 3, MemoryStorage::new()).unwrap();
        game.key_down(Key::Reset);
        assert_eq!(game.state().session, 2);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert!(game.state().bullets.is_empty());
    }

    fn game_with_score(movement: MovementMode, score: u32) -> Game<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        save_score(&mut storage, score);
        let mut game = Game::new(config(movement), 11, storage).unwrap();
        game.state.enemies.clear();
        game
    }

    #[test]
    fn test_shot_penalty_is_persisted() {
        let mut game = game_with_score(MovementMode::Continuous, 100);
        let player = game.state().player.pos;
        // Lands inside the hit radius on the first enemy tick
        game.state.spawn_bullet(player + Vec2::new(0.6, 0.0), player);

        game.frame(0.0);
        let events = game.frame(25.0);

        assert_eq!(game.state().phase, GamePhase::Shot);
        assert!(events.contains(&GameEvent::Shot));
        assert_eq!(load_score(game.storage()), 70);
    }

    #[test]
    fn test_trap_penalty_is_persisted() {
        let mut game = game_with_score(MovementMode::Discrete, 100);
        let tile = game.state().player.tile();
        let (key, trap) = if tile.x + 1 < game.state().size {
            (Key::C, tile + IVec2::X)
        } else {
            (Key::Q, tile - IVec2::X)
        };
        game.state.grid.set(trap, Tile::Trap);

        game.key_down(key);

        assert_eq!(game.state().phase, GamePhase::Trapped);
        // One step in, then the penalty
        assert_eq!(load_score(game.storage()), 71);
    }

    #[test]
    fn test_snapshot_is_json() {
        let game = Game::new(config(MovementMode::Continuous), 3, MemoryStorage::new()).unwrap();
        let json = game.snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["size"], 12);
        assert_eq!(value["phase"], "Playing");
    }
}
