//! Maze engine and terminal frontend for fogmaze.
//!
//! The engine carves a maze for a level, scatters hazards across it, and runs a play session on
//! it in which the player explores through a fog of war, fetches the key that opens the exit door
//! and avoids the traps on the way. Every source of randomness is injected, so a seeded generator
//! always yields the same sequence of mazes.
//!
//! The terminal frontend only talks to the engine through [`game::Session`] commands and the
//! [`game::Snapshot`]s the session publishes.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod cli;
pub mod difficulty;
pub mod game;
pub mod generator;
pub mod grid;
pub mod hazards;
pub mod logging;
pub mod pathfinding;
pub mod progress;
pub mod timers;
pub mod visibility;

mod app;
mod events;
mod types;
mod ui;

pub use app::{App, TerminalSession};
