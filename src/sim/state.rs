//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything a session mutates. Input
//! handlers and the enemy tick both take it by `&mut`, so every reader sees
//! the latest player position.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::events::GameEvent;
use super::grid::{Grid, tile_of};
use super::mapgen::{GeneratedMap, find_spawn, generate_map};
use super::notes::NoteMap;
use super::scoring::{Score, ScoringPolicy, step_budget};
use crate::tuning::{ConfigError, SessionConfig};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    /// Reached the goal
    Won,
    /// Countdown budget ran out
    Lost,
    /// Stepped on a trap
    Trapped,
    /// Hit by a bullet
    Shot,
}

impl GamePhase {
    /// Every phase but `Playing` is absorbing until reset
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Playing
    }

    /// End-of-session banner text
    pub fn banner(self) -> Option<&'static str> {
        match self {
            GamePhase::Playing => None,
            GamePhase::Won => Some("YOU WON!"),
            GamePhase::Lost => Some("OUT OF STEPS!"),
            GamePhase::Trapped => Some("TRAPPED!"),
            GamePhase::Shot => Some("SHOT!"),
        }
    }
}

/// The player's token
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Grid-space position; integral in discrete mode
    pub pos: Vec2,
    /// Last tile a crossing event was emitted for
    pub last_tile: IVec2,
}

impl Player {
    pub fn at(tile: IVec2) -> Self {
        Self {
            pos: tile.as_vec2(),
            last_tile: tile,
        }
    }

    pub fn tile(&self) -> IVec2 {
        tile_of(self.pos)
    }
}

/// A roaming, shooting enemy
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub tile: IVec2,
    /// Ticks since the last wander step
    pub move_timer: u32,
    /// Ticks until the next shot attempt
    pub shoot_timer: i32,
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Fixed per-tick displacement, set at fire time
    pub vel: Vec2,
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: SessionConfig,
    /// Seed the session RNG was created from
    pub seed: u64,
    /// Grid side, fixed for the process
    pub size: i32,
    /// Sessions started so far (1 for the first)
    pub session: u32,
    pub grid: Grid,
    pub start: IVec2,
    pub goal: IVec2,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    /// Sorted by id
    pub bullets: Vec<Bullet>,
    pub score: Score,
    pub phase: GamePhase,
    /// Enemy ticks run this session
    pub time_ticks: u64,
    #[serde(skip)]
    pub notes: NoteMap,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start the first session.
    ///
    /// `steps_done` seeds a cumulative score (ignored for countdown).
    pub fn new(config: SessionConfig, seed: u64, steps_done: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let size = config.grid_size.unwrap_or_else(|| {
            let (lo, hi) = config.tuning.grid_size_range;
            rng.random_range(lo..=hi)
        });
        let map = generate_map(size, &config.tuning, &mut rng);
        Ok(Self::assemble(config, seed, rng, map, steps_done))
    }

    /// Start a session on a prepared map (hand-built levels, tests)
    pub fn from_map(
        config: SessionConfig,
        seed: u64,
        map: GeneratedMap,
        steps_done: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Pcg32::seed_from_u64(seed);
        Ok(Self::assemble(config, seed, rng, map, steps_done))
    }

    fn assemble(
        config: SessionConfig,
        seed: u64,
        rng: Pcg32,
        map: GeneratedMap,
        steps_done: u32,
    ) -> Self {
        let score = match config.scoring {
            ScoringPolicy::Cumulative => Score::cumulative(steps_done),
            ScoringPolicy::Countdown => {
                Score::countdown(step_budget(map.start, map.goal, config.tuning.budget_slack))
            }
        };
        let mut state = Self {
            size: map.grid.size(),
            config,
            seed,
            session: 0,
            grid: Grid::new(0),
            start: IVec2::ZERO,
            goal: IVec2::ZERO,
            player: Player::at(IVec2::ZERO),
            enemies: Vec::new(),
            bullets: Vec::new(),
            score,
            phase: GamePhase::Playing,
            time_ticks: 0,
            notes: NoteMap::default(),
            rng,
            events: Vec::new(),
            next_id: 1,
        };
        state.install(map);
        state
    }

    /// Replace the session contents with a freshly generated map
    fn install(&mut self, map: GeneratedMap) {
        self.session += 1;
        self.grid = map.grid;
        self.start = map.start;
        self.goal = map.goal;
        self.notes = map.notes;
        self.player = Player::at(map.start);
        self.bullets.clear();
        self.events.clear();
        self.enemies.clear();
        for tile in map.enemy_spawns {
            let enemy = self.new_enemy(tile);
            self.enemies.push(enemy);
        }
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;

        log::info!(
            "Session {} started: {}x{} grid, start {:?}, goal {:?}, {} enemies, score {}",
            self.session,
            self.size,
            self.size,
            self.start,
            self.goal,
            self.enemies.len(),
            self.score.value
        );
    }

    /// Begin a new session on the same grid size.
    ///
    /// Drops in-flight bullets and queued events from the old session.
    /// Cumulative scores carry over, countdown budgets are recomputed.
    pub fn reset(&mut self) {
        let map = generate_map(self.size, &self.config.tuning, &mut self.rng);
        let budget = step_budget(map.start, map.goal, self.config.tuning.budget_slack);
        self.score = self.score.for_new_session(budget);
        self.install(map);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build an enemy on `tile` with a fresh initial shot delay
    pub fn new_enemy(&mut self, tile: IVec2) -> Enemy {
        let (lo, hi) = self.config.tuning.initial_shot_delay;
        let shoot_timer = self.rng.random_range(lo..hi) as i32;
        Enemy {
            id: self.next_entity_id(),
            tile,
            move_timer: 0,
            shoot_timer,
        }
    }

    /// Spawn a replacement enemy clear of the player's current tile
    pub fn spawn_replacement(&mut self) -> Option<u32> {
        let avoid = self.player.tile();
        let tile = find_spawn(&self.grid, avoid, &self.config.tuning, &mut self.rng)?;
        let enemy = self.new_enemy(tile);
        let id = enemy.id;
        log::debug!("Enemy {} spawned at {:?}", id, tile);
        self.enemies.push(enemy);
        Some(id)
    }

    /// Fire a bullet from `origin` toward `target` at the tuned speed
    pub fn spawn_bullet(&mut self, origin: Vec2, target: Vec2) -> Option<u32> {
        let dir = (target - origin).normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: origin,
            vel: dir * self.config.tuning.bullet_speed,
        });
        Some(id)
    }

    /// Commit a terminal transition. Only the first one in a session sticks.
    pub fn finish(&mut self, phase: GamePhase) -> bool {
        if self.phase.is_terminal() || !phase.is_terminal() {
            return false;
        }
        self.phase = phase;
        let event = match phase {
            GamePhase::Won => GameEvent::Won,
            GamePhase::Trapped => GameEvent::Trapped,
            GamePhase::Shot => GameEvent::Shot,
            GamePhase::Lost => GameEvent::Lost,
            GamePhase::Playing => unreachable!("filtered above"),
        };
        if matches!(phase, GamePhase::Trapped | GamePhase::Shot) {
            self.score.apply_penalty(self.config.tuning.failure_penalty);
        }
        self.events.push(event);
        log::info!(
            "Session {} ended: {:?} after {} ticks, score {}",
            self.session,
            phase,
            self.time_ticks,
            self.score.value
        );
        true
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
    }
}
