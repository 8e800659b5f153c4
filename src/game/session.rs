//! # Session Module
//!
//! The turn-resolution state machine. One session owns exactly one player and
//! one live floor; a level transition replaces the floor and re-attaches the
//! same player instance.
//!
//! Every input event resolves to at most one world mutation (move, attack, or
//! pickup), always followed by the floor's enemy pass and the terminal
//! checks. The attack flourish is the one exception: presentation only, no
//! world turn consumed.

use crate::config;
use crate::game::{
    Actor, AttackOutcome, Direction, EntityId, Floor, Item, Occupant, Player, Position, TileKind,
    Viewport,
};
use crate::generation::{FloorConfig, FloorGenerator};
use crate::rendering::{FloorRenderer, Hud};
use crate::DelveResult;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// States of the turn engine.
///
/// `Resolving` is transient within a single [`GameSession::resolve_turn`]
/// call; `LevelTransition` likewise always returns to `AwaitingInput` on the
/// new floor. `GameOver` is terminal: no further movement input is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    AwaitingInput,
    Resolving,
    LevelTransition,
    GameOver,
}

/// What a resolved turn meant for the session, surfaced to the host so it
/// can present transitions and the terminal death signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input arrived while the engine was not accepting it; nothing happened
    Ignored,
    /// The turn completed on the current floor
    Continued,
    /// The player fell through a hole; play continues on the new depth
    NewFloor(u32),
    /// The player died; the session is over
    PlayerDied,
}

/// Events produced by the world update, translated into HUD messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerStruck {
        by: EntityId,
        damage: u32,
        remaining: u32,
    },
    PlayerDied,
    EnemyStruck {
        id: EntityId,
        remaining: u32,
    },
    EnemyDefeated {
        id: EntityId,
    },
    ItemPickedUp {
        item: Item,
    },
}

/// Result of advancing the attack flourish by one display tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTick {
    /// Not enough time has passed for the next frame
    Idle,
    /// Render flourish frame `0..FLOURISH_FRAMES`
    Frame(usize),
    /// Animation complete; restore the tile
    Finished,
}

/// Cancellable timed task for the cosmetic attack flourish: five frames at a
/// throttled ~10 fps, driven by the host's display ticks.
///
/// The session drops the task on level transition or game over, so a stale
/// animation can never touch a discarded floor's tiles.
#[derive(Debug, Clone)]
pub struct AttackAnimation {
    frame: usize,
    last_frame_at: Instant,
    interval: Duration,
}

impl AttackAnimation {
    /// Starts an animation; the first frame renders one interval from `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            frame: 0,
            last_frame_at: now,
            interval: Duration::from_millis(config::FLOURISH_INTERVAL_MS),
        }
    }

    /// Advances the animation against the current time.
    pub fn tick(&mut self, now: Instant) -> AnimationTick {
        if now.duration_since(self.last_frame_at) < self.interval {
            return AnimationTick::Idle;
        }
        self.last_frame_at = now;
        let frame = self.frame;
        self.frame += 1;
        if frame < config::FLOURISH_FRAMES {
            AnimationTick::Frame(frame)
        } else {
            AnimationTick::Finished
        }
    }
}

/// The session: turn engine, level progression, and collaborator wiring.
///
/// Renderer and HUD are injected at construction and reached only through
/// their narrow traits; the core holds no ambient global state.
///
/// # Examples
///
/// ```no_run
/// use delve::{Direction, GameSession, TurnOutcome, Viewport};
/// # use delve::rendering::{FloorRenderer, Hud};
/// # use delve::{Floor, Player};
/// # struct NullRenderer;
/// # impl FloorRenderer for NullRenderer {
/// #     fn render_floor(&mut self, _: &Floor, _: &Player) {}
/// #     fn render_single_tile(&mut self, _: &str) {}
/// #     fn recenter_camera(&mut self, _: &Player, _: &Floor) {}
/// # }
/// # struct NullHud;
/// # impl Hud for NullHud {
/// #     fn set_floor_indicator(&mut self, _: u32) {}
/// #     fn set_enemy_count(&mut self, _: usize) {}
/// #     fn post_event(&mut self, _: &str) {}
/// #     fn announce_new_floor(&mut self) {}
/// # }
/// let viewport = Viewport::from_pixels(1280, 720);
/// let mut session =
///     GameSession::new("Rogue".to_string(), 42, viewport, NullRenderer, NullHud).unwrap();
/// let outcome = session.resolve_turn(Direction::South);
/// assert_ne!(outcome, TurnOutcome::Ignored);
/// ```
pub struct GameSession<R: FloorRenderer, H: Hud> {
    player: Player,
    floor: Floor,
    state: EngineState,
    animation: Option<AttackAnimation>,
    viewport: Viewport,
    rng: StdRng,
    renderer: R,
    hud: H,
}

impl<R: FloorRenderer, H: Hud> GameSession<R, H> {
    /// Creates a session on a freshly generated first floor.
    ///
    /// The player and HUD are fully initialized before this returns, so input
    /// is armed only on a consistent world.
    pub fn new(
        name: String,
        seed: u64,
        viewport: Viewport,
        renderer: R,
        hud: H,
    ) -> DelveResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut floor = FloorGenerator::generate(&FloorConfig::new(1), 1, &mut rng)?;
        floor.viewport = viewport;

        let player = Player::new(name, floor.player_spawn);
        let mut session = Self {
            player,
            floor,
            state: EngineState::AwaitingInput,
            animation: None,
            viewport,
            rng,
            renderer,
            hud,
        };
        session.attach_player_to_floor();
        info!("session started on floor 1 (seed {})", seed);
        Ok(session)
    }

    /// Creates a session on a handcrafted floor. Used by tests and tools that
    /// need a known layout instead of a generated one.
    pub fn with_floor(name: String, floor: Floor, seed: u64, renderer: R, hud: H) -> Self {
        let viewport = floor.viewport;
        let player = Player::new(name, floor.player_spawn);
        let mut session = Self {
            player,
            floor,
            state: EngineState::AwaitingInput,
            animation: None,
            viewport,
            rng: StdRng::seed_from_u64(seed),
            renderer,
            hud,
        };
        session.attach_player_to_floor();
        session
    }

    fn attach_player_to_floor(&mut self) {
        self.floor.spawn_player(&mut self.player);
        self.hud.set_floor_indicator(self.floor.depth);
        self.hud.set_enemy_count(self.floor.enemies.len());
        self.hud.announce_new_floor();
        self.renderer.render_floor(&self.floor, &self.player);
        self.renderer.recenter_camera(&self.player, &self.floor);
    }

    /// Current engine state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// True once the session has ended in the player's death.
    pub fn is_game_over(&self) -> bool {
        self.state == EngineState::GameOver
    }

    /// The persistent player character.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The live floor.
    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    /// The injected HUD collaborator.
    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// The injected renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Resolves one movement turn.
    ///
    /// Dispatch precedence against the candidate tile: enemy occupancy, then
    /// item, then walkability, else no-op. Exactly one of those branches
    /// mutates the world; the enemy pass then runs regardless, followed by
    /// the hole and death checks. Death takes precedence when both fire in
    /// the same turn.
    pub fn resolve_turn(&mut self, direction: Direction) -> TurnOutcome {
        if self.state != EngineState::AwaitingInput {
            return TurnOutcome::Ignored;
        }
        self.state = EngineState::Resolving;

        let candidate = self.player.move_attempt(direction);
        let target = *self.floor.tile(candidate);

        if target.enemy().is_some() {
            self.player_attack(candidate);
        } else if let Some(item) = target.item {
            self.player_pickup(candidate, item);
        } else if target.is_open() {
            self.player_move(candidate);
        } else {
            debug!("blocked move toward {:?}", candidate);
        }

        let events = self.floor.update(&mut self.player);
        for event in &events {
            self.post_event(event);
        }

        if !self.player.is_alive() {
            return self.game_over();
        }
        if self.floor.tile(self.player.position()).kind == TileKind::Hole {
            return self.enter_new_level();
        }

        self.state = EngineState::AwaitingInput;
        TurnOutcome::Continued
    }

    /// Starts the attack flourish without consuming a world turn.
    ///
    /// Presentation only: no dispatch, no enemy pass. Ignored while an
    /// animation is already in flight or input is not armed.
    pub fn trigger_attack_flourish(&mut self, now: Instant) {
        if self.state != EngineState::AwaitingInput || self.animation.is_some() {
            return;
        }
        self.animation = Some(AttackAnimation::new(now));
    }

    /// Advances the flourish animation on a display tick, rendering the next
    /// frame when due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(animation) = self.animation.as_mut() {
            match animation.tick(now) {
                AnimationTick::Idle => {}
                AnimationTick::Frame(index) => {
                    self.renderer.render_single_tile(&format!("cutd0{index}"));
                }
                AnimationTick::Finished => {
                    self.renderer.render_single_tile("empty");
                    self.animation = None;
                }
            }
        }
    }

    /// True while a flourish animation is in flight.
    pub fn animation_in_flight(&self) -> bool {
        self.animation.is_some()
    }

    /// Recomputes the viewport from new display dimensions and re-renders.
    pub fn handle_resize(&mut self, width_px: u32, height_px: u32) {
        self.viewport = Viewport::from_pixels(width_px, height_px);
        self.floor.viewport = self.viewport;
        self.renderer.render_floor(&self.floor, &self.player);
    }

    fn player_attack(&mut self, target: Position) {
        match self.floor.resolve_attack(target, self.player.attack_power) {
            AttackOutcome::EnemyDefeated(id) => {
                self.floor.remove_enemy(id);
                self.hud.set_enemy_count(self.floor.enemies.len());
                self.post_event(&GameEvent::EnemyDefeated { id });
            }
            AttackOutcome::EnemyHit { id, remaining } => {
                self.post_event(&GameEvent::EnemyStruck { id, remaining });
            }
            // Unreachable on this dispatch path: the tile was classified as
            // enemy-occupied, and a player attack never damages the player.
            AttackOutcome::NoTarget | AttackOutcome::PlayerDefeated => {}
        }
    }

    fn player_pickup(&mut self, target: Position, item: Item) {
        self.player.pickup_item(item);
        if let Some(tile) = self.floor.tile_mut(target) {
            tile.item = None;
        }
        self.post_event(&GameEvent::ItemPickedUp { item });
    }

    fn player_move(&mut self, to: Position) {
        let from = self.player.position();
        if let Some(tile) = self.floor.tile_mut(from) {
            tile.occupant = None;
        }
        if let Some(tile) = self.floor.tile_mut(to) {
            tile.occupant = Some(Occupant::Player);
        }
        self.player.set_position(to);
        self.renderer.recenter_camera(&self.player, &self.floor);
    }

    fn enter_new_level(&mut self) -> TurnOutcome {
        self.state = EngineState::LevelTransition;
        self.animation = None;

        let depth = self.floor.depth + 1;
        info!("descending to floor {}", depth);

        match FloorGenerator::generate(&FloorConfig::new(depth), depth, &mut self.rng) {
            Ok(mut floor) => {
                floor.viewport = self.viewport;
                self.floor = floor;
            }
            Err(err) => {
                // Generation is infallible for sane configs; keep the session
                // alive on the old floor if it ever is not.
                log::error!("floor generation failed at depth {}: {}", depth, err);
                self.state = EngineState::AwaitingInput;
                return TurnOutcome::Continued;
            }
        }

        self.attach_player_to_floor();
        self.state = EngineState::AwaitingInput;
        TurnOutcome::NewFloor(depth)
    }

    fn game_over(&mut self) -> TurnOutcome {
        self.state = EngineState::GameOver;
        self.animation = None;
        self.hud.post_event("You have died.");
        info!("game over on floor {}", self.floor.depth);
        TurnOutcome::PlayerDied
    }

    fn post_event(&mut self, event: &GameEvent) {
        let message = match event {
            GameEvent::PlayerStruck {
                damage, remaining, ..
            } => format!("You are struck for {damage} damage ({remaining} hp left)."),
            GameEvent::PlayerDied => return, // game_over posts the death line
            GameEvent::EnemyStruck { remaining, .. } => {
                format!("You strike the enemy ({remaining} hp left).")
            }
            GameEvent::EnemyDefeated { .. } => "Enemy slain.".to_string(),
            GameEvent::ItemPickedUp { item } => {
                format!("Picked up {:?}.", item.kind)
            }
        };
        self.hud.post_event(&message);
    }
}
