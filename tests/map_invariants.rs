//! Property tests for map generation and enemy placement

use glam::{IVec2, Vec2};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use survive::sim::mapgen::{find_spawn, generate_map, goal_margin};
use survive::sim::{GameState, Tile};
use survive::{SessionConfig, Tuning, chebyshev};

fn neighbourhood(center: IVec2) -> impl Iterator<Item = IVec2> {
    (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| center + IVec2::new(dx, dy)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn start_and_goal_areas_are_clear(seed in any::<u64>(), size in 1i32..=29) {
        let tuning = Tuning::default();
        let map = generate_map(size, &tuning, &mut Pcg32::seed_from_u64(seed));

        for center in [map.start, map.goal] {
            prop_assert!(map.grid.in_bounds(center));
            for pos in neighbourhood(center).filter(|&p| map.grid.in_bounds(p)) {
                prop_assert_eq!(map.grid.get(pos), Some(Tile::Empty));
            }
        }
    }

    #[test]
    fn goal_keeps_its_distance(seed in any::<u64>(), size in 1i32..=29) {
        let tuning = Tuning::default();
        let map = generate_map(size, &tuning, &mut Pcg32::seed_from_u64(seed));
        let d = (map.goal - map.start).abs();
        let margin = goal_margin(size);
        prop_assert!(d.x >= margin && d.y >= margin);
    }

    #[test]
    fn initial_spawns_are_clear_of_start(seed in any::<u64>(), size in 10i32..=20) {
        let tuning = Tuning::default();
        let map = generate_map(size, &tuning, &mut Pcg32::seed_from_u64(seed));

        prop_assert!(map.enemy_spawns.len() >= 2 && map.enemy_spawns.len() <= 5);
        for &spawn in &map.enemy_spawns {
            prop_assert!(map.grid.is_empty(spawn));
            prop_assert!(chebyshev(spawn, map.start) >= 3);
        }
    }

    #[test]
    fn small_grids_relax_instead_of_hanging(seed in any::<u64>(), size in 1i32..=4) {
        let tuning = Tuning::default();
        let map = generate_map(size, &tuning, &mut Pcg32::seed_from_u64(seed));
        for &spawn in &map.enemy_spawns {
            prop_assert!(map.grid.is_empty(spawn));
            prop_assert_ne!(spawn, map.start);
        }
    }

    #[test]
    fn respawns_avoid_current_player_tile(
        seed in any::<u64>(),
        px in 0.0f32..14.0,
        py in 0.0f32..14.0,
    ) {
        let config = SessionConfig {
            grid_size: Some(14),
            ..Default::default()
        };
        let mut state = GameState::new(config, seed, 0).unwrap();
        state.player.pos = Vec2::new(px, py);
        let player_tile = state.player.tile();

        let id = state.spawn_replacement().unwrap();
        let enemy = state.enemies.iter().find(|e| e.id == id).unwrap();
        prop_assert!(state.grid.is_empty(enemy.tile));
        prop_assert!(chebyshev(enemy.tile, player_tile) >= 3);
    }

    #[test]
    fn spawn_search_is_bounded(seed in any::<u64>(), attempts in 1u32..20) {
        // A 5x5 board with every tile but one walled
        let tuning = Tuning { max_placement_attempts: attempts, ..Default::default() };
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut map = generate_map(5, &tuning, &mut rng);
        for pos in map.grid.positions().collect::<Vec<_>>() {
            map.grid.set(pos, Tile::Wall);
        }
        map.grid.set(IVec2::new(4, 4), Tile::Empty);

        let spawn = find_spawn(&map.grid, IVec2::ZERO, &tuning, &mut rng);
        prop_assert_eq!(spawn, Some(IVec2::new(4, 4)));
    }
}
