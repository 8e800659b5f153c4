//! # Input Module
//!
//! Classifies raw keyboard events into the discrete inputs the turn engine
//! understands: one of four cardinal movement directions, the attack
//! flourish, or a host-level command.
//!
//! One key press yields at most one input per frame, so the platform event
//! order alone serializes turn resolution.

use crate::game::Direction;
use macroquad::prelude::*;

/// A discrete player input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step, attack into, or pick up from the adjacent tile
    Move(Direction),
    /// Cosmetic attack flourish; consumes no world turn
    Flourish,
    /// Restart the session (only meaningful after game over)
    Restart,
    /// Quit the game
    Quit,
}

/// Keyboard poller for the macroquad event loop.
pub struct InputHandler {
    /// Whether WASD doubles as movement alongside the arrow keys
    pub wasd_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates an input handler with WASD movement enabled.
    pub fn new() -> Self {
        Self { wasd_enabled: true }
    }

    /// Returns the input for this frame's key press, if any.
    pub fn poll(&self) -> Option<PlayerInput> {
        if is_key_pressed(KeyCode::Escape) {
            return Some(PlayerInput::Quit);
        }
        if is_key_pressed(KeyCode::Enter) {
            return Some(PlayerInput::Restart);
        }
        if is_key_pressed(KeyCode::Space) {
            return Some(PlayerInput::Flourish);
        }

        if is_key_pressed(KeyCode::Up) {
            return Some(PlayerInput::Move(Direction::North));
        }
        if is_key_pressed(KeyCode::Down) {
            return Some(PlayerInput::Move(Direction::South));
        }
        if is_key_pressed(KeyCode::Left) {
            return Some(PlayerInput::Move(Direction::West));
        }
        if is_key_pressed(KeyCode::Right) {
            return Some(PlayerInput::Move(Direction::East));
        }

        if self.wasd_enabled {
            if is_key_pressed(KeyCode::W) {
                return Some(PlayerInput::Move(Direction::North));
            }
            if is_key_pressed(KeyCode::S) {
                return Some(PlayerInput::Move(Direction::South));
            }
            if is_key_pressed(KeyCode::A) {
                return Some(PlayerInput::Move(Direction::West));
            }
            if is_key_pressed(KeyCode::D) {
                return Some(PlayerInput::Move(Direction::East));
            }
        }

        None
    }
}
