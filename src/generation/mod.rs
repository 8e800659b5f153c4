//! # Generation Module
//!
//! Procedural floor layouts: a seeded random-walk carver that guarantees a
//! connected walkable region, then places the descent hole, enemies, and
//! items on it.
//!
//! Each floor is generated at construction time and never regenerated;
//! difficulty scales with depth through [`FloorConfig::new`].

use crate::game::{Enemy, Floor, Item, ItemKind, Position, TileKind};
use crate::{DelveError, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for generating one floor.
///
/// # Examples
///
/// ```
/// use delve::FloorConfig;
///
/// let shallow = FloorConfig::new(1);
/// let deep = FloorConfig::new(8);
/// assert!(deep.enemy_count > shallow.enemy_count);
/// assert!(deep.enemy_health >= shallow.enemy_health);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Grid width in tiles, including the wall border
    pub width: u32,
    /// Grid height in tiles, including the wall border
    pub height: u32,
    /// Enemies to place (capped by available open tiles)
    pub enemy_count: u32,
    /// Items to place (capped by available open tiles)
    pub item_count: u32,
    /// Fraction of the interior carved walkable (0.0 to 1.0)
    pub carve_ratio: f64,
    /// Manhattan radius within which enemies chase the player
    pub chase_radius: u32,
    /// Health of each spawned enemy
    pub enemy_health: u32,
    /// Attack power of each spawned enemy
    pub enemy_attack: u32,
}

impl FloorConfig {
    /// Creates a configuration for the given depth, scaling difficulty as
    /// the player descends.
    pub fn new(depth: u32) -> Self {
        Self {
            width: 24,
            height: 18,
            enemy_count: 3 + depth,
            item_count: 2,
            carve_ratio: 0.55,
            chase_radius: 6,
            enemy_health: 5 + depth * 2,
            enemy_attack: 1 + depth / 3,
        }
    }

    /// Creates a configuration for testing with a small, sparse floor.
    pub fn for_testing() -> Self {
        Self {
            width: 10,
            height: 10,
            enemy_count: 1,
            item_count: 1,
            carve_ratio: 0.6,
            chase_radius: 4,
            enemy_health: 5,
            enemy_attack: 1,
        }
    }
}

/// Seeded floor generator.
///
/// Carves a connected region by random walk from the spawn tile, so every
/// placed feature is reachable, then drops exactly one hole on the carved
/// tile farthest from spawn.
pub struct FloorGenerator;

impl FloorGenerator {
    /// Generates a floor at the given depth.
    ///
    /// Fails only on degenerate configurations (a grid too small to hold a
    /// spawn and a hole).
    pub fn generate(config: &FloorConfig, depth: u32, rng: &mut StdRng) -> DelveResult<Floor> {
        if config.width < 4 || config.height < 4 {
            return Err(DelveError::GenerationFailed(format!(
                "grid {}x{} too small",
                config.width, config.height
            )));
        }

        let mut floor = Floor::empty(depth, config.width, config.height, config.chase_radius);
        for row in floor.grid.iter_mut() {
            for tile in row.iter_mut() {
                tile.kind = TileKind::Wall;
            }
        }

        let spawn = Position::new(
            rng.gen_range(1..config.width as i32 - 1),
            rng.gen_range(1..config.height as i32 - 1),
        );
        let carved = Self::carve(&mut floor, config, spawn, rng);
        if carved.len() < 2 {
            return Err(DelveError::GenerationFailed(
                "carved region too small for spawn and hole".to_string(),
            ));
        }

        floor.player_spawn = spawn;
        let hole = Self::place_hole(&mut floor, &carved, spawn);
        Self::populate(&mut floor, config, &carved, spawn, hole, rng);

        debug!(
            "generated floor {}: {} open tiles, {} enemies",
            depth,
            carved.len(),
            floor.enemies.len()
        );
        Ok(floor)
    }

    /// Random-walk carve from `spawn`. Returns carved positions in carve
    /// order; the region is connected by construction.
    fn carve(
        floor: &mut Floor,
        config: &FloorConfig,
        spawn: Position,
        rng: &mut StdRng,
    ) -> Vec<Position> {
        let interior = (config.width - 2) as usize * (config.height - 2) as usize;
        let target = ((interior as f64 * config.carve_ratio) as usize).max(2);

        let mut carved = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = spawn;
        let mut steps = 0usize;

        loop {
            if seen.insert(cursor) {
                if let Some(tile) = floor.tile_mut(cursor) {
                    tile.kind = TileKind::Floor;
                }
                carved.push(cursor);
            }
            if carved.len() >= target || steps > interior * 50 {
                break;
            }
            steps += 1;

            let direction = crate::game::Direction::all()[rng.gen_range(0..4)];
            let next = cursor.step(direction);
            let in_interior = next.x >= 1
                && next.y >= 1
                && next.x < config.width as i32 - 1
                && next.y < config.height as i32 - 1;
            if in_interior {
                cursor = next;
            }
        }

        carved
    }

    /// Converts the carved tile farthest from spawn into the descent hole.
    fn place_hole(floor: &mut Floor, carved: &[Position], spawn: Position) -> Position {
        let hole = carved
            .iter()
            .copied()
            .filter(|&pos| pos != spawn)
            .max_by_key(|&pos| spawn.manhattan_distance(pos))
            .unwrap_or(spawn);
        if let Some(tile) = floor.tile_mut(hole) {
            tile.kind = TileKind::Hole;
        }
        hole
    }

    /// Scatters enemies and items over the remaining carved tiles.
    fn populate(
        floor: &mut Floor,
        config: &FloorConfig,
        carved: &[Position],
        spawn: Position,
        hole: Position,
        rng: &mut StdRng,
    ) {
        let mut candidates: Vec<Position> = carved
            .iter()
            .copied()
            .filter(|&pos| pos != spawn && pos != hole)
            .collect();
        candidates.shuffle(rng);

        let mut remaining = candidates.into_iter();
        for _ in 0..config.enemy_count {
            match remaining.next() {
                Some(pos) => floor.place_enemy(Enemy::new(
                    pos,
                    config.enemy_health,
                    config.enemy_attack,
                )),
                None => break,
            }
        }
        for _ in 0..config.item_count {
            match remaining.next() {
                Some(pos) => {
                    let kind = match rng.gen_range(0..3) {
                        0 => ItemKind::Potion,
                        1 => ItemKind::Sword,
                        _ => ItemKind::Trinket,
                    };
                    if let Some(tile) = floor.tile_mut(pos) {
                        tile.item = Some(Item {
                            kind,
                            effect: rng.gen_range(1..=4),
                        });
                    }
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Actor;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn generate(seed: u64) -> Floor {
        let mut rng = StdRng::seed_from_u64(seed);
        FloorGenerator::generate(&FloorConfig::new(1), 1, &mut rng)
            .expect("generation should succeed")
    }

    #[test]
    fn test_spawn_tile_is_open() {
        for seed in 0..20 {
            let floor = generate(seed);
            assert!(
                floor.is_open(floor.player_spawn),
                "seed {} produced a blocked spawn",
                seed
            );
        }
    }

    #[test]
    fn test_exactly_one_hole() {
        for seed in 0..20 {
            let floor = generate(seed);
            let holes = floor
                .grid
                .iter()
                .flat_map(|row| row.iter())
                .filter(|tile| tile.kind == TileKind::Hole)
                .count();
            assert_eq!(holes, 1, "seed {} produced {} holes", seed, holes);
        }
    }

    #[test]
    fn test_no_feature_on_walls() {
        for seed in 0..20 {
            let floor = generate(seed);
            for row in &floor.grid {
                for tile in row {
                    if tile.kind == TileKind::Wall {
                        assert!(tile.occupant.is_none());
                        assert!(tile.item.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_enemies_occupy_distinct_walkable_tiles() {
        let floor = generate(99);
        let mut seen = HashSet::new();
        for enemy in floor.enemies.values() {
            let pos = enemy.position();
            assert!(floor.tile(pos).kind.is_walkable());
            assert_eq!(floor.tile(pos).enemy(), Some(enemy.id));
            assert!(seen.insert(pos), "two enemies share {:?}", pos);
        }
        assert_eq!(floor.enemies.len(), FloorConfig::new(1).enemy_count as usize);
    }

    #[test]
    fn test_hole_is_reachable_from_spawn() {
        for seed in 0..20 {
            let floor = generate(seed);
            // Flood fill over walkable terrain, ignoring occupants.
            let mut queue = VecDeque::from([floor.player_spawn]);
            let mut visited = HashSet::from([floor.player_spawn]);
            let mut found_hole = false;
            while let Some(pos) = queue.pop_front() {
                if floor.tile(pos).kind == TileKind::Hole {
                    found_hole = true;
                    break;
                }
                for direction in crate::game::Direction::all() {
                    let next = pos.step(direction);
                    if floor.tile(next).kind.is_walkable() && visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            assert!(found_hole, "seed {}: hole unreachable from spawn", seed);
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let a = generate(7);
        let b = generate(7);
        assert_eq!(a.player_spawn, b.player_spawn);
        assert_eq!(
            a.grid
                .iter()
                .flatten()
                .map(|t| t.kind)
                .collect::<Vec<_>>(),
            b.grid.iter().flatten().map(|t| t.kind).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_degenerate_grid_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = FloorConfig::for_testing();
        config.width = 3;
        assert!(FloorGenerator::generate(&config, 1, &mut rng).is_err());
    }
}
