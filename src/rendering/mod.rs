//! # Rendering Module
//!
//! The narrow collaborator contracts the game core consumes, and the
//! macroquad display that implements them.
//!
//! The core only ever calls through [`FloorRenderer`] and [`Hud`]; both are
//! fire-and-forget with no return values, so rendering can never fail a turn.

pub mod display;

pub use display::{MacroquadDisplay, SharedDisplay};

use crate::game::{Floor, Player};

/// Rendering collaborator consumed by the session.
pub trait FloorRenderer {
    /// Re-renders the whole floor (called on spawn, transition, and resize).
    fn render_floor(&mut self, floor: &Floor, player: &Player);

    /// Renders one tile by id; used by the attack flourish frames
    /// (`cutd00`..`cutd04`, then `empty` to restore).
    fn render_single_tile(&mut self, tile_id: &str);

    /// Re-centers the camera on the player.
    fn recenter_camera(&mut self, player: &Player, floor: &Floor);
}

/// HUD collaborator consumed by the session.
pub trait Hud {
    /// Shows the current floor depth.
    fn set_floor_indicator(&mut self, depth: u32);

    /// Shows the live enemy count.
    fn set_enemy_count(&mut self, count: usize);

    /// Appends a line to the event log.
    fn post_event(&mut self, message: &str);

    /// Announces arrival on a new floor.
    fn announce_new_floor(&mut self);
}
