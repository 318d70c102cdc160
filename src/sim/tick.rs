//! Fixed timestep enemy/bullet tick
//!
//! Advances every enemy and bullet exactly once. Runs on its own cadence,
//! independent of rendering and player input, and always reads the current
//! player position straight from the state.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::events::GameEvent;
use super::grid::{Grid, Tile, tile_of};
use super::state::{GamePhase, GameState};

const ORTHOGONAL: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// Advance the session by one enemy tick. No-op once the session has ended.
pub fn tick(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;

    update_enemies(state);
    update_bullets(state);

    state.normalize_order();
}

/// Random orthogonal, in-bounds, non-wall neighbour of `tile`
pub fn wander_target(grid: &Grid, tile: IVec2, rng: &mut impl Rng) -> Option<IVec2> {
    let options: Vec<IVec2> = ORTHOGONAL
        .iter()
        .map(|&d| tile + d)
        .filter(|&t| grid.is_walkable(t))
        .collect();
    options.choose(rng).copied()
}

fn update_enemies(state: &mut GameState) {
    let tuning = &state.config.tuning;
    let interval = tuning.enemy_move_interval;
    let (reload_lo, reload_hi) = tuning.reload_ticks;
    let range = tuning.shoot_range;
    let player = state.player.pos;

    let mut dead = Vec::new();
    let mut shots = Vec::new();

    for enemy in state.enemies.iter_mut() {
        enemy.move_timer += 1;
        if enemy.move_timer >= interval {
            enemy.move_timer = 0;
            if let Some(next) = wander_target(&state.grid, enemy.tile, &mut state.rng) {
                enemy.tile = next;
                if state.grid.get(next) == Some(Tile::Trap) {
                    dead.push(enemy.id);
                    continue;
                }
            }
        }

        enemy.shoot_timer -= 1;
        if enemy.shoot_timer <= 0 {
            enemy.shoot_timer = state.rng.random_range(reload_lo..reload_hi) as i32;
            let origin = enemy.tile.as_vec2();
            let dist = origin.distance(player);
            if dist > 0.0 && dist < range {
                shots.push((enemy.id, origin));
            }
        }
    }

    if !dead.is_empty() {
        state.enemies.retain(|e| !dead.contains(&e.id));
        for id in &dead {
            log::debug!("Enemy {} fell into a trap", id);
            if state.spawn_replacement().is_none() {
                log::warn!("No tile left to respawn enemy {}", id);
            }
        }
    }

    for (enemy_id, origin) in shots {
        if state.spawn_bullet(origin, player).is_some() {
            state.events.push(GameEvent::EnemyShoot { enemy_id });
        }
    }
}

fn update_bullets(state: &mut GameState) {
    let grid = &state.grid;
    let player = state.player.pos;
    let hit_radius = state.config.tuning.hit_radius;
    let mut hit = None;

    state.bullets.retain_mut(|bullet| {
        // Nothing moves after the hit
        if hit.is_some() {
            return true;
        }
        bullet.pos += bullet.vel;
        if !grid.contains_point(bullet.pos) || grid.get(tile_of(bullet.pos)) == Some(Tile::Wall) {
            return false;
        }
        if bullet.pos.distance(player) < hit_radius {
            hit = Some(bullet.id);
            return false;
        }
        true
    });

    if let Some(id) = hit {
        log::debug!("Bullet {} hit the player at {:?}", id, player);
        state.finish(GamePhase::Shot);
    }
}

/// Ticks a bullet fired from `distance` away needs to hit a stationary player
pub fn ticks_to_hit(distance: f32, speed: f32, hit_radius: f32) -> u32 {
    let travel = (distance - hit_radius).max(0.0);
    (travel / speed).floor() as u32 + 1
}
