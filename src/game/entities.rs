//! # Entity Module
//!
//! The grid occupants: the player character that survives the whole session
//! and the enemies each floor owns, plus the inert items they trade.

use crate::config;
use crate::game::{Direction, Position};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for floor-owned entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Shared capability set of anything standing on the grid: it has a position
/// and a health pool, and it is destroyed when health reaches zero.
pub trait Actor {
    /// Current grid position.
    fn position(&self) -> Position;

    /// Moves the actor's bookkeeping to a new position. Tile occupancy is the
    /// floor's responsibility; callers keep the two in sync.
    fn set_position(&mut self, position: Position);

    /// Remaining health.
    fn health(&self) -> u32;

    /// Applies damage. Returns true when this hit destroyed the actor.
    fn take_damage(&mut self, amount: u32) -> bool;

    /// True while health is above zero.
    fn is_alive(&self) -> bool {
        self.health() > 0
    }
}

/// The controlled character. Exactly one exists per session; it is owned by
/// the [`GameSession`](crate::GameSession) and survives floor transitions
/// with inventory and health intact.
///
/// # Examples
///
/// ```
/// use delve::{Actor, Direction, Player, Position};
///
/// let player = Player::new("Rogue".to_string(), Position::new(2, 2));
/// assert_eq!(player.move_attempt(Direction::South), Position::new(2, 3));
/// assert_eq!(player.position(), Position::new(2, 2)); // attempt is pure
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Display name, supplied at session construction
    pub name: String,
    position: Position,
    health: u32,
    /// Fixed damage dealt per attack; no variance or mitigation
    pub attack_power: u32,
    /// Picked-up items in pickup order
    pub inventory: Vec<Item>,
}

impl Player {
    /// Creates a player at the given position with default combat stats.
    pub fn new(name: String, position: Position) -> Self {
        Self {
            name,
            position,
            health: config::DEFAULT_PLAYER_HEALTH,
            attack_power: config::DEFAULT_PLAYER_ATTACK,
            inventory: Vec::new(),
        }
    }

    /// Computes the candidate position one step in the given direction.
    ///
    /// Pure: no state changes and no legality check. The floor classifies the
    /// target tile and the session decides what actually happens.
    pub fn move_attempt(&self, direction: Direction) -> Position {
        self.position.step(direction)
    }

    /// Appends an item to the inventory. The caller clears the originating
    /// tile's item slot.
    pub fn pickup_item(&mut self, item: Item) {
        self.inventory.push(item);
    }
}

impl Actor for Player {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

/// A hostile grid occupant, owned by the floor that spawned it and removed
/// from the roster when defeated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    position: Position,
    health: u32,
    pub attack_power: u32,
}

impl Enemy {
    /// Creates an enemy at the given position.
    pub fn new(position: Position, health: u32, attack_power: u32) -> Self {
        Self {
            id: new_entity_id(),
            position,
            health,
            attack_power,
        }
    }
}

impl Actor for Enemy {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

/// Inert pickup data. Moved by value from a tile's item slot into the
/// player's inventory; no lifecycle of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Magnitude of the item's effect when applied
    pub effect: u32,
}

/// Kinds of item a floor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Potion,
    Sword,
    Trinket,
}

/// Result of resolving an attack against a tile's occupant.
///
/// A tagged variant instead of inspecting runtime identity: the session
/// matches on this to decide roster removal versus game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// The tile had no occupant; nothing happened
    NoTarget,
    /// An enemy was hit but survived
    EnemyHit { id: EntityId, remaining: u32 },
    /// An enemy was destroyed; the floor must remove it from the roster
    EnemyDefeated(EntityId),
    /// The player was destroyed; the session must enter game over
    PlayerDefeated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_attempt_is_pure() {
        let player = Player::new("Hero".to_string(), Position::new(4, 4));
        let candidate = player.move_attempt(Direction::West);
        assert_eq!(candidate, Position::new(3, 4));
        assert_eq!(player.position(), Position::new(4, 4));
    }

    #[test]
    fn test_take_damage_saturates_at_zero() {
        let mut enemy = Enemy::new(Position::new(1, 1), 3, 1);
        assert!(enemy.take_damage(10));
        assert_eq!(enemy.health(), 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_take_damage_reports_destruction_once() {
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        assert!(!player.take_damage(config::DEFAULT_PLAYER_HEALTH - 1));
        assert!(player.is_alive());
        assert!(player.take_damage(1));
    }

    #[test]
    fn test_pickup_appends_in_order() {
        let mut player = Player::new("Hero".to_string(), Position::new(0, 0));
        let potion = Item {
            kind: ItemKind::Potion,
            effect: 4,
        };
        let sword = Item {
            kind: ItemKind::Sword,
            effect: 2,
        };
        player.pickup_item(potion);
        player.pickup_item(sword);
        assert_eq!(player.inventory, vec![potion, sword]);
    }

    #[test]
    fn test_enemy_ids_are_unique() {
        let a = Enemy::new(Position::new(0, 0), 5, 2);
        let b = Enemy::new(Position::new(0, 1), 5, 2);
        assert_ne!(a.id, b.id);
    }
}
