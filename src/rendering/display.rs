//! # Display Management
//!
//! 2D rendering of the floor grid and HUD using macroquad.
//!
//! Macroquad draws in immediate mode, so the per-frame work happens in
//! [`MacroquadDisplay::draw`], driven from the main loop. The collaborator
//! trait calls from the session only update display state (camera position,
//! HUD figures, flourish overlay); they never draw directly.

use crate::config;
use crate::game::{Actor, Floor, Occupant, Player, Position, TileKind};
use crate::rendering::{FloorRenderer, Hud};
use macroquad::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to the display.
///
/// The session needs both a renderer and a HUD; a single display backs both
/// through cheap clones of this handle. Single-threaded by design, matching
/// the engine's execution model.
pub type SharedDisplay = Rc<RefCell<MacroquadDisplay>>;

/// Macroquad display: floor grid, HUD panel, message log, flourish overlay.
pub struct MacroquadDisplay {
    /// Tile the camera is centered on
    pub camera: Position,
    /// Message history, newest last
    pub messages: Vec<String>,
    /// Maximum messages kept
    pub max_messages: usize,
    /// Floor depth shown in the HUD
    pub floor_indicator: u32,
    /// Enemy count shown in the HUD
    pub enemy_count: usize,
    /// Flourish frame currently overlaid, if any
    pub flourish_tile: Option<String>,
}

impl MacroquadDisplay {
    /// Creates a display with empty HUD state.
    pub fn new() -> Self {
        Self {
            camera: Position::new(0, 0),
            messages: Vec::new(),
            max_messages: 50,
            floor_indicator: 0,
            enemy_count: 0,
            flourish_tile: None,
        }
    }

    /// Creates a shared handle suitable for injecting into a session twice.
    pub fn shared() -> SharedDisplay {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Draws one frame: the visible window of the floor, the entities on it,
    /// and the HUD text.
    pub fn draw(&self, floor: &Floor, player: &Player, game_over: bool) {
        clear_background(BLACK);

        let tile = config::TILE_SIZE as f32;
        let view_w = floor.viewport.width.max(1) as i32;
        let view_h = floor.viewport.height.max(1) as i32;
        let origin_x = self.camera.x - view_w / 2;
        let origin_y = self.camera.y - view_h / 2;

        for screen_y in 0..view_h {
            for screen_x in 0..view_w {
                let world = Position::new(origin_x + screen_x, origin_y + screen_y);
                let px = screen_x as f32 * tile;
                let py = screen_y as f32 * tile;
                self.draw_tile(floor, world, px, py, tile);

                if self.flourish_tile.is_some() && world == player.position() {
                    draw_rectangle_lines(px, py, tile, tile, 4.0, ORANGE);
                }
            }
        }

        self.draw_hud(player, game_over);
    }

    fn draw_tile(&self, floor: &Floor, world: Position, px: f32, py: f32, tile: f32) {
        let cell = floor.tile(world);
        let ground = match cell.kind {
            TileKind::Wall => DARKGRAY,
            TileKind::Floor => Color::new(0.35, 0.3, 0.25, 1.0),
            TileKind::Hole => Color::new(0.05, 0.05, 0.12, 1.0),
        };
        draw_rectangle(px, py, tile - 1.0, tile - 1.0, ground);

        if cell.item.is_some() {
            draw_rectangle(
                px + tile * 0.35,
                py + tile * 0.35,
                tile * 0.3,
                tile * 0.3,
                GOLD,
            );
        }
        match cell.occupant {
            Some(Occupant::Player) => {
                draw_rectangle(px + 4.0, py + 4.0, tile - 9.0, tile - 9.0, GREEN);
            }
            Some(Occupant::Enemy(_)) => {
                draw_rectangle(px + 4.0, py + 4.0, tile - 9.0, tile - 9.0, RED);
            }
            None => {}
        }
    }

    fn draw_hud(&self, player: &Player, game_over: bool) {
        let line = 22.0;
        let hud_y = screen_height() - line * 5.0;

        draw_text(
            &format!(
                "{}  hp {}  floor {}  enemies {}",
                player.name,
                player.health(),
                self.floor_indicator,
                self.enemy_count
            ),
            10.0,
            hud_y,
            20.0,
            WHITE,
        );

        for (i, message) in self.messages.iter().rev().take(3).enumerate() {
            draw_text(
                message,
                10.0,
                hud_y + line * (3.0 - i as f32),
                18.0,
                LIGHTGRAY,
            );
        }

        if game_over {
            let cx = screen_width() / 2.0;
            let cy = screen_height() / 2.0;
            draw_text("You have died.", cx - 90.0, cy, 32.0, RED);
            draw_text("Press Enter to restart", cx - 100.0, cy + 30.0, 20.0, WHITE);
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl FloorRenderer for SharedDisplay {
    fn render_floor(&mut self, _floor: &Floor, player: &Player) {
        // Immediate mode: the frame is redrawn every tick. A full re-render
        // request only needs to resync the camera.
        self.borrow_mut().camera = player.position();
    }

    fn render_single_tile(&mut self, tile_id: &str) {
        let mut display = self.borrow_mut();
        display.flourish_tile = if tile_id == "empty" {
            None
        } else {
            Some(tile_id.to_string())
        };
    }

    fn recenter_camera(&mut self, player: &Player, _floor: &Floor) {
        self.borrow_mut().camera = player.position();
    }
}

impl Hud for SharedDisplay {
    fn set_floor_indicator(&mut self, depth: u32) {
        self.borrow_mut().floor_indicator = depth;
    }

    fn set_enemy_count(&mut self, count: usize) {
        self.borrow_mut().enemy_count = count;
    }

    fn post_event(&mut self, message: &str) {
        self.borrow_mut().push_message(message.to_string());
    }

    fn announce_new_floor(&mut self) {
        let mut display = self.borrow_mut();
        let depth = display.floor_indicator;
        display.push_message(format!("You descend to floor {depth}."));
    }
}
