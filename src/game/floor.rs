//! # Floor Module
//!
//! One dungeon level: the tile grid, the enemy roster, the viewport window,
//! and the per-turn enemy pass.
//!
//! Exactly one floor is live at a time. Level transitions replace the whole
//! floor rather than mutating it in place, so stale references from a
//! discarded floor can never leak into a new turn.

use crate::config;
use crate::game::{Actor, AttackOutcome, Enemy, EntityId, GameEvent, Item, Player, Position};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Terrain classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable; never carries an occupant or item
    Wall,
    /// Ordinary walkable ground
    Floor,
    /// Walkable; ends the floor when the player stands on it
    Hole,
}

impl TileKind {
    /// True for terrain an entity may stand on.
    pub fn is_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Hole)
    }
}

/// Non-owning reference to whatever is standing on a tile. The player is
/// owned by the session and enemies by the floor roster; tiles only index
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Player,
    Enemy(EntityId),
}

/// A single grid cell: terrain, optional occupant, optional item.
///
/// Invariant: a [`TileKind::Wall`] tile never has an occupant or an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub occupant: Option<Occupant>,
    pub item: Option<Item>,
}

impl Tile {
    /// Creates an empty tile of the given kind.
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            occupant: None,
            item: None,
        }
    }

    /// True iff the tile is walkable terrain with no occupant. Items do not
    /// block; the turn engine intercepts them before movement anyway.
    pub fn is_open(&self) -> bool {
        self.kind.is_walkable() && self.occupant.is_none()
    }

    /// True when an enemy stands here.
    pub fn enemy(&self) -> Option<EntityId> {
        match self.occupant {
            Some(Occupant::Enemy(id)) => Some(id),
            _ => None,
        }
    }
}

/// Sentinel returned for any out-of-bounds query: indistinguishable from a
/// wall, so edge-of-grid move attempts resolve to no-ops.
static OUT_OF_BOUNDS: Tile = Tile {
    kind: TileKind::Wall,
    occupant: None,
    item: None,
};

/// The visible window size in tiles, derived from display dimensions.
///
/// # Examples
///
/// ```
/// use delve::Viewport;
///
/// let vp = Viewport::from_pixels(1280, 720);
/// assert_eq!(vp.width, 20);
/// assert_eq!(vp.height, 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Derives the viewport from a pixel display size at the fixed tile size.
    pub fn from_pixels(width_px: u32, height_px: u32) -> Self {
        Self {
            width: width_px / config::TILE_SIZE,
            height: height_px / config::TILE_SIZE,
        }
    }
}

/// One dungeon level: grid, enemy roster, viewport, and spawn point.
///
/// The floor owns its tiles and enemies. The player is only referenced
/// through tile occupancy; the session owns the player itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    /// 1-based depth counter, monotonically increasing across the session
    pub depth: u32,
    /// Tile grid indexed `[row][col]`, i.e. `grid[y][x]`
    pub grid: Vec<Vec<Tile>>,
    /// Live enemies, keyed by id; insertion order is irrelevant
    pub enemies: HashMap<EntityId, Enemy>,
    /// Visible window in tiles, recomputed on resize
    pub viewport: Viewport,
    /// Walkable tile the player starts this floor on
    pub player_spawn: Position,
    /// Enemies within this Manhattan distance chase the player
    pub chase_radius: u32,
}

impl Floor {
    /// Creates a floor of all-floor tiles ringed by walls, with no enemies or
    /// items. Generation carves the interesting layout on top of this.
    pub fn empty(depth: u32, width: u32, height: u32, chase_radius: u32) -> Self {
        let grid = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let border =
                            x == 0 || y == 0 || x == width - 1 || y == height - 1;
                        Tile::new(if border { TileKind::Wall } else { TileKind::Floor })
                    })
                    .collect()
            })
            .collect();

        Self {
            depth,
            grid,
            enemies: HashMap::new(),
            viewport: Viewport::from_pixels(0, 0),
            player_spawn: Position::new(1, 1),
            chase_radius,
        }
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.grid.first().map_or(0, |row| row.len()) as u32
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.grid.len() as u32
    }

    /// Classifies the tile at a position. Out-of-bounds positions resolve to
    /// a wall sentinel rather than being undefined.
    pub fn tile(&self, position: Position) -> &Tile {
        self.tile_ref(position).unwrap_or(&OUT_OF_BOUNDS)
    }

    fn tile_ref(&self, position: Position) -> Option<&Tile> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.grid
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    /// Mutable access to an in-bounds tile.
    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.grid
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
    }

    /// True iff the tile at `position` is walkable and unoccupied.
    pub fn is_open(&self, position: Position) -> bool {
        self.tile(position).is_open()
    }

    /// Places the player on this floor's spawn tile.
    ///
    /// The spawn tile is guaranteed open by construction; a blocked spawn is
    /// an internal invariant violation, logged and skipped rather than
    /// escalated.
    pub fn spawn_player(&mut self, player: &mut Player) {
        let spawn = self.player_spawn;
        if !self.is_open(spawn) {
            warn!("floor {}: spawn tile {:?} is blocked", self.depth, spawn);
            return;
        }
        if let Some(tile) = self.tile_mut(spawn) {
            tile.occupant = Some(Occupant::Player);
        }
        player.set_position(spawn);
    }

    /// Registers an enemy on the roster and marks its tile occupied.
    /// Used during generation; the target tile must be open.
    pub fn place_enemy(&mut self, enemy: Enemy) {
        let position = enemy.position();
        if let Some(tile) = self.tile_mut(position) {
            debug_assert!(tile.is_open(), "enemy placed on blocked tile");
            tile.occupant = Some(Occupant::Enemy(enemy.id));
        }
        self.enemies.insert(enemy.id, enemy);
    }

    /// Deletes an enemy from the roster and clears its tile, which becomes
    /// walkable again.
    pub fn remove_enemy(&mut self, id: EntityId) {
        if let Some(enemy) = self.enemies.remove(&id) {
            if let Some(tile) = self.tile_mut(enemy.position()) {
                tile.occupant = None;
            }
        }
    }

    /// Resolves a player attack against the occupant of `target`.
    ///
    /// Damage is the fixed attack power; no variance. The defeated enemy is
    /// reported but not removed here: the session matches on the outcome and
    /// calls [`Floor::remove_enemy`], keeping roster bookkeeping and HUD
    /// notification in one place.
    pub fn resolve_attack(&mut self, target: Position, power: u32) -> AttackOutcome {
        let id = match self.tile(target).enemy() {
            Some(id) => id,
            None => return AttackOutcome::NoTarget,
        };
        match self.enemies.get_mut(&id) {
            Some(enemy) => {
                if enemy.take_damage(power) {
                    AttackOutcome::EnemyDefeated(id)
                } else {
                    AttackOutcome::EnemyHit {
                        id,
                        remaining: enemy.health(),
                    }
                }
            }
            None => AttackOutcome::NoTarget,
        }
    }

    /// Runs one world tick after the player's action: every live enemy reacts.
    ///
    /// An enemy cardinally adjacent to the player attacks it; an enemy within
    /// the chase radius takes one step toward the player if an open tile
    /// allows; anything further away idles. Enemy actions stop once the
    /// player is destroyed.
    pub fn update(&mut self, player: &mut Player) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let ids: Vec<EntityId> = self.enemies.keys().copied().collect();

        for id in ids {
            if !player.is_alive() {
                break;
            }
            let (position, attack_power) = match self.enemies.get(&id) {
                Some(enemy) => (enemy.position(), enemy.attack_power),
                None => continue,
            };

            if position.is_cardinal_adjacent(player.position()) {
                let died = player.take_damage(attack_power);
                events.push(GameEvent::PlayerStruck {
                    by: id,
                    damage: attack_power,
                    remaining: player.health(),
                });
                if died {
                    events.push(GameEvent::PlayerDied);
                }
            } else if position.manhattan_distance(player.position()) <= self.chase_radius {
                if let Some(next) = self.chase_step(position, player.position()) {
                    self.move_enemy(id, next);
                }
            }
        }

        events
    }

    /// Picks the open tile one step from `from` that closes the larger axis
    /// gap toward `target`, falling back to the other axis.
    fn chase_step(&self, from: Position, target: Position) -> Option<Position> {
        let dx = target.x - from.x;
        let dy = target.y - from.y;

        let horizontal = Position::new(from.x + dx.signum(), from.y);
        let vertical = Position::new(from.x, from.y + dy.signum());

        let (first, second) = if dx.abs() >= dy.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        [first, second]
            .into_iter()
            .find(|&candidate| candidate != from && self.is_open(candidate))
    }

    fn move_enemy(&mut self, id: EntityId, to: Position) {
        let from = match self.enemies.get(&id) {
            Some(enemy) => enemy.position(),
            None => return,
        };
        if let Some(tile) = self.tile_mut(from) {
            tile.occupant = None;
        }
        if let Some(tile) = self.tile_mut(to) {
            tile.occupant = Some(Occupant::Enemy(id));
        }
        if let Some(enemy) = self.enemies.get_mut(&id) {
            enemy.set_position(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ItemKind;

    fn test_floor() -> Floor {
        Floor::empty(1, 8, 8, 6)
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let floor = test_floor();
        assert_eq!(floor.tile(Position::new(-1, 3)).kind, TileKind::Wall);
        assert_eq!(floor.tile(Position::new(3, -1)).kind, TileKind::Wall);
        assert_eq!(floor.tile(Position::new(100, 3)).kind, TileKind::Wall);
        assert!(!floor.is_open(Position::new(-5, -5)));
    }

    #[test]
    fn test_border_is_wall_interior_is_open() {
        let floor = test_floor();
        assert_eq!(floor.tile(Position::new(0, 0)).kind, TileKind::Wall);
        assert_eq!(floor.tile(Position::new(7, 4)).kind, TileKind::Wall);
        assert!(floor.is_open(Position::new(3, 3)));
    }

    #[test]
    fn test_spawn_player_sets_occupancy() {
        let mut floor = test_floor();
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        floor.spawn_player(&mut player);
        assert_eq!(player.position(), floor.player_spawn);
        assert_eq!(
            floor.tile(floor.player_spawn).occupant,
            Some(Occupant::Player)
        );
        assert!(!floor.is_open(floor.player_spawn));
    }

    #[test]
    fn test_remove_enemy_clears_tile() {
        let mut floor = test_floor();
        let enemy = Enemy::new(Position::new(4, 4), 5, 2);
        let id = enemy.id;
        floor.place_enemy(enemy);
        assert_eq!(floor.tile(Position::new(4, 4)).enemy(), Some(id));

        floor.remove_enemy(id);
        assert!(floor.enemies.is_empty());
        assert!(floor.is_open(Position::new(4, 4)));
    }

    #[test]
    fn test_resolve_attack_defeats_weak_enemy() {
        let mut floor = test_floor();
        let enemy = Enemy::new(Position::new(3, 2), 5, 2);
        let id = enemy.id;
        floor.place_enemy(enemy);

        let outcome = floor.resolve_attack(Position::new(3, 2), 5);
        assert_eq!(outcome, AttackOutcome::EnemyDefeated(id));
    }

    #[test]
    fn test_resolve_attack_reports_surviving_enemy() {
        let mut floor = test_floor();
        let enemy = Enemy::new(Position::new(3, 2), 9, 2);
        let id = enemy.id;
        floor.place_enemy(enemy);

        let outcome = floor.resolve_attack(Position::new(3, 2), 5);
        assert_eq!(outcome, AttackOutcome::EnemyHit { id, remaining: 4 });
        assert!(floor.enemies.contains_key(&id));
    }

    #[test]
    fn test_resolve_attack_empty_tile_is_no_target() {
        let mut floor = test_floor();
        assert_eq!(
            floor.resolve_attack(Position::new(3, 3), 5),
            AttackOutcome::NoTarget
        );
    }

    #[test]
    fn test_adjacent_enemy_attacks_on_update() {
        let mut floor = test_floor();
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        floor.player_spawn = Position::new(2, 2);
        floor.spawn_player(&mut player);
        floor.place_enemy(Enemy::new(Position::new(3, 2), 5, 2));

        let before = player.health();
        let events = floor.update(&mut player);
        assert_eq!(player.health(), before - 2);
        assert!(matches!(events[0], GameEvent::PlayerStruck { damage: 2, .. }));
    }

    #[test]
    fn test_distant_enemy_chases_player() {
        let mut floor = test_floor();
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        floor.player_spawn = Position::new(2, 2);
        floor.spawn_player(&mut player);

        let enemy = Enemy::new(Position::new(5, 2), 5, 2);
        let id = enemy.id;
        floor.place_enemy(enemy);

        let events = floor.update(&mut player);
        assert!(events.is_empty());
        assert_eq!(floor.enemies[&id].position(), Position::new(4, 2));
        assert_eq!(floor.tile(Position::new(4, 2)).enemy(), Some(id));
        assert!(floor.is_open(Position::new(5, 2)));
    }

    #[test]
    fn test_enemy_outside_chase_radius_idles() {
        let mut floor = Floor::empty(1, 16, 16, 3);
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        floor.player_spawn = Position::new(2, 2);
        floor.spawn_player(&mut player);

        let enemy = Enemy::new(Position::new(12, 12), 5, 2);
        let id = enemy.id;
        floor.place_enemy(enemy);

        floor.update(&mut player);
        assert_eq!(floor.enemies[&id].position(), Position::new(12, 12));
    }

    #[test]
    fn test_enemy_pass_stops_when_player_dies() {
        let mut floor = test_floor();
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        floor.player_spawn = Position::new(2, 2);
        floor.spawn_player(&mut player);
        floor.place_enemy(Enemy::new(Position::new(3, 2), 5, 100));
        floor.place_enemy(Enemy::new(Position::new(1, 2), 5, 100));

        let events = floor.update(&mut player);
        assert!(!player.is_alive());
        assert!(events.contains(&GameEvent::PlayerDied));
        // Exactly one strike landed; the pass stopped at death.
        let strikes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerStruck { .. }))
            .count();
        assert_eq!(strikes, 1);
    }

    #[test]
    fn test_item_does_not_block_walkability_query() {
        let mut floor = test_floor();
        let pos = Position::new(4, 4);
        floor.tile_mut(pos).unwrap().item = Some(Item {
            kind: ItemKind::Potion,
            effect: 4,
        });
        assert!(floor.is_open(pos));
    }

    #[test]
    fn test_viewport_from_pixels() {
        let vp = Viewport::from_pixels(1920, 1080);
        assert_eq!(vp.width, 30);
        assert_eq!(vp.height, 16);
    }
}
