//! Core application state and main loop of the terminal frontend.

use std::{sync::mpsc::Receiver, time::Instant};

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{
    events,
    game::{Command, Session, Snapshot},
    progress::{LevelStore, XpTally},
    types::{MainMenuItem, Screen},
    ui,
};

/// Session type driven by the terminal frontend.
pub type TerminalSession = Session<XpTally, Box<dyn LevelStore>>;

/// Application state container for the terminal frontend.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to. The maze itself lives
/// in the [`Session`]; the frontend only ever draws the latest [`Snapshot`] it received.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Game session receiving the player's commands.
    pub(crate) session: TerminalSession,
    /// Channel on which the session publishes its snapshots.
    pub(crate) snapshots: Receiver<Snapshot>,
    /// Latest snapshot received, which is what gets drawn.
    pub(crate) snapshot: Snapshot,
    /// Moment the session timers were last advanced.
    pub(crate) last_tick: Instant,
}

impl App {
    /// Creates the application around a ready session, starting on the main menu.
    pub fn new(mut session: TerminalSession) -> Self {
        let snapshots = session.subscribe();
        let snapshot = snapshots
            .try_recv()
            .unwrap_or_else(|_| session.snapshot());

        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            session,
            snapshots,
            snapshot,
            last_tick: Instant::now(),
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame).map_err(std::io::Error::other)
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Forwards a command to the session and picks up the resulting snapshot.
    pub(crate) fn dispatch(&mut self, command: Command) -> bool {
        let accepted = self.session.handle(command);
        self.sync();

        accepted
    }

    /// Advances the session timers by the time elapsed since the previous tick.
    pub(crate) fn tick(&mut self) {
        let now = Instant::now();
        let _ = self.session.tick(now.duration_since(self.last_tick));
        self.last_tick = now;
        self.sync();
    }

    /// Drains the snapshot channel, keeping the most recent snapshot.
    fn sync(&mut self) {
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.snapshot = snapshot;
        }
    }
}
