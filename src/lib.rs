//! # Delve
//!
//! A single-player, turn-structured dungeon crawl. A persistent player
//! character descends through procedurally generated floors; each floor is a
//! grid of tiles holding walls, enemies, items, and a single hole leading
//! down.
//!
//! ## Architecture Overview
//!
//! The crate is split along the seams the game itself has:
//!
//! - **Game Core**: entities, floor grid, and the turn-resolution state
//!   machine ([`GameSession`]). One input event resolves to at most one world
//!   mutation, followed by a synchronous enemy pass and terminal checks.
//! - **Generation System**: seeded procedural floor layouts ([`generation`]).
//! - **Input System**: discrete keyboard events classified as a movement
//!   direction or the attack flourish ([`input`]).
//! - **Rendering System**: narrow collaborator traits consumed by the core,
//!   with a macroquad implementation behind them ([`rendering`]).
//!
//! The core never reaches into ambient global state: the renderer and HUD are
//! injected at session construction, and viewport changes arrive as explicit
//! calls.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;

pub use game::{
    Actor, AttackAnimation, AttackOutcome, Direction, Enemy, EngineState, EntityId, Floor,
    GameEvent, GameSession, Item, ItemKind, Occupant, Player, Position, Tile, TileKind,
    TurnOutcome, Viewport,
};

pub use generation::{FloorConfig, FloorGenerator};
pub use input::{InputHandler, PlayerInput};
pub use rendering::{FloorRenderer, Hud, MacroquadDisplay, SharedDisplay};

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// Game state is invalid (a lifecycle invariant was violated)
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Floor generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Tile edge length in pixels; viewport dimensions derive from this
    pub const TILE_SIZE: u32 = 64;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: u32 = 20;

    /// Default player attack power
    pub const DEFAULT_PLAYER_ATTACK: u32 = 5;

    /// Frames in the attack flourish animation
    pub const FLOURISH_FRAMES: usize = 5;

    /// Milliseconds between flourish frames (~10 fps)
    pub const FLOURISH_INTERVAL_MS: u64 = 100;
}
