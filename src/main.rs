//! # Delve Main Entry Point
//!
//! Parses arguments, initializes logging, and runs the macroquad event loop
//! that feeds discrete inputs into the game session.

use clap::Parser;
use log::info;
use macroquad::prelude::*;
use std::time::Instant;

use delve::{
    DelveResult, GameSession, InputHandler, MacroquadDisplay, PlayerInput, SharedDisplay,
    TurnOutcome, Viewport,
};

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A turn-structured dungeon crawl where every floor ends in a hole")]
#[command(version)]
struct Args {
    /// Player name shown in the HUD
    #[arg(short, long, default_value = "Rogue")]
    name: String,

    /// Random seed for floor generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Delve")]
async fn main() -> DelveResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Delve v{}", delve::VERSION);

    let seed = args.seed.unwrap_or(12345);
    let display = MacroquadDisplay::shared();
    let input_handler = InputHandler::new();

    let mut session = new_session(&args.name, seed, &display)?;
    let mut last_screen = (screen_width() as u32, screen_height() as u32);

    loop {
        let screen = (screen_width() as u32, screen_height() as u32);
        if screen != last_screen {
            session.handle_resize(screen.0, screen.1);
            last_screen = screen;
        }

        match input_handler.poll() {
            Some(PlayerInput::Quit) => {
                info!("player quit");
                break;
            }
            Some(PlayerInput::Restart) => {
                if session.is_game_over() {
                    info!("restarting session");
                    display.borrow_mut().messages.clear();
                    session = new_session(&args.name, seed.wrapping_add(1), &display)?;
                }
            }
            Some(PlayerInput::Flourish) => {
                session.trigger_attack_flourish(Instant::now());
            }
            Some(PlayerInput::Move(direction)) => match session.resolve_turn(direction) {
                TurnOutcome::NewFloor(depth) => info!("descended to floor {}", depth),
                TurnOutcome::PlayerDied => info!("player died"),
                TurnOutcome::Continued | TurnOutcome::Ignored => {}
            },
            None => {}
        }

        session.tick(Instant::now());

        display
            .borrow()
            .draw(session.floor(), session.player(), session.is_game_over());

        next_frame().await;
    }

    Ok(())
}

/// Builds a fresh session wired to the shared display.
fn new_session(
    name: &str,
    seed: u64,
    display: &SharedDisplay,
) -> DelveResult<GameSession<SharedDisplay, SharedDisplay>> {
    let viewport = Viewport::from_pixels(screen_width() as u32, screen_height() as u32);
    GameSession::new(
        name.to_string(),
        seed,
        viewport,
        display.clone(),
        display.clone(),
    )
}

/// Initializes env_logger at the requested level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
