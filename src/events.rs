//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode};

use crate::{
    game::Command,
    grid::Direction,
    types::{MainMenuItem, Screen},
    App,
};

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler
/// functions based on the current screen. It uses a timeout to avoid blocking the UI, and advances
/// the session timers on every pass so hints expire even while no key is pressed.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            handle_key(app, key.code);
        }
    }

    app.tick();

    Ok(())
}

/// Dispatches a key press to the handler of the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::MainMenu(item) => handle_menu_key(app, item, code),
        Screen::InGame => handle_game_key(app, code),
    }
}

/// Handles key presses on the main menu.
///
/// The menu follows the vi-style keys: `j` moves down, `k` moves up, and `l` (or enter) selects.
fn handle_menu_key(app: &mut App, item: MainMenuItem, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
        KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
        KeyCode::Char('l') | KeyCode::Enter => match item {
            MainMenuItem::StartGame => app.screen = Screen::InGame,
            MainMenuItem::Quit => app.exit = true,
        },
        _ => {}
    }
}

/// Handles key presses while a maze is on screen.
fn handle_game_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('h') | KeyCode::Esc => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        code => {
            if let Some(command) = game_command(code) {
                let _ = app.dispatch(command);
            }
        }
    }
}

/// Maps a key to the session command it triggers, if any.
///
/// Arrows and `wasd` move, `g` asks for a hint, `r` restarts the maze and `n` advances to the
/// next level after a victory.
pub(crate) const fn game_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Up | KeyCode::Char('w') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Command::Move(Direction::Right),
        KeyCode::Char('g') => Command::RequestHint,
        KeyCode::Char('r') => Command::Restart,
        KeyCode::Char('n') => Command::AdvanceLevel,
        _ => return None,
    };

    Some(command)
}
