//! # Game Module
//!
//! Core game state: grid coordinates, entities, floors, and the
//! turn-resolution state machine.
//!
//! Everything the turn engine mutates lives here. Rendering and HUD concerns
//! are reached only through the narrow traits in [`crate::rendering`].

pub mod entities;
pub mod floor;
pub mod session;

pub use entities::*;
pub use floor::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// A 2D integer grid coordinate.
///
/// # Examples
///
/// ```
/// use delve::{Direction, Position};
///
/// let pos = Position::new(3, 7);
/// assert_eq!(pos.step(Direction::North), Position::new(3, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position one step away in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.delta()
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Position;
    ///
    /// assert_eq!(Position::new(0, 0).manhattan_distance(Position::new(3, 4)), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// True when `other` is exactly one cardinal step away.
    pub fn is_cardinal_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// The four cardinal movement directions.
///
/// Movement in Delve is strictly cardinal; there are no diagonal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Position};
    ///
    /// assert_eq!(Direction::North.delta(), Position::new(0, -1));
    /// ```
    pub fn delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Returns all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.step(Direction::North), Position::new(5, 4));
        assert_eq!(pos.step(Direction::South), Position::new(5, 6));
        assert_eq!(pos.step(Direction::East), Position::new(6, 5));
        assert_eq!(pos.step(Direction::West), Position::new(4, 5));
    }

    #[test]
    fn test_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
        assert_eq!(pos2.manhattan_distance(pos1), 7);
    }

    #[test]
    fn test_cardinal_adjacency() {
        let pos = Position::new(2, 2);
        assert!(pos.is_cardinal_adjacent(Position::new(2, 3)));
        assert!(pos.is_cardinal_adjacent(Position::new(1, 2)));
        assert!(!pos.is_cardinal_adjacent(Position::new(3, 3))); // diagonal
        assert!(!pos.is_cardinal_adjacent(pos));
    }

    #[test]
    fn test_direction_deltas_are_unit_steps() {
        let origin = Position::new(0, 0);
        for direction in Direction::all() {
            assert_eq!(origin.manhattan_distance(origin.step(direction)), 1);
        }
    }
}
