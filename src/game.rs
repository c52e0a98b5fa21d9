//! Game session state machine.
//!
//! A [`Session`] owns one maze at a time together with the player on it. It accepts the discrete
//! commands coming from the frontend, applies them to the grid in place, and reports every
//! observable change to its subscribers as an immutable [`Snapshot`]. Victories are reported to
//! the experience sink and the level store handed in by the caller.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Duration,
};

use log::{debug, error, info, warn};
use rand_chacha::ChaCha8Rng;

use crate::{
    difficulty::{Difficulty, HINT_LENGTH},
    generator,
    grid::{Cell, CellKind, Coord, Direction, Grid, MazeError},
    hazards,
    pathfinding::{self, Passage},
    progress::{LevelStore, XpSink},
    timers::HintClock,
    visibility,
};

/// Phase of the current maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The player is walking the maze.
    Playing,
    /// The exit was reached; only advancing to the next level is possible.
    Victory,
    /// The player stepped on a trap; only restarting is possible.
    GameOver,
}

/// Input accepted by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step one cell in a direction.
    Move(Direction),
    /// Highlight the first part of the route to the current objective.
    RequestHint,
    /// Replace the maze with a fresh one of the same level.
    Restart,
    /// Move on to a fresh maze of the next level after a victory.
    AdvanceLevel,
}

/// Immutable view of a session, emitted after every observable change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Current level.
    pub level: u32,
    /// Current phase.
    pub mode: Mode,
    /// Player position.
    pub player: Coord,
    /// Whether the door may be crossed.
    pub has_key: bool,
    /// Whether this level guards its exit with a key and a door.
    pub gated: bool,
    /// Seconds left before another hint may be requested.
    pub cooldown_secs: u32,
    /// Whether a hint is currently highlighted.
    pub hint_active: bool,
    /// Side length of the grid.
    pub size: usize,
    /// Every cell of the grid in row-major order.
    pub cells: Vec<Cell>,
}

impl Snapshot {
    /// Returns the cell at a coordinate.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        if coord.x >= self.size || coord.y >= self.size {
            return None;
        }

        self.cells.get(coord.y * self.size + coord.x)
    }
}

/// One play session: a maze, the player on it, and the collaborators notified on victory.
#[derive(Debug)]
pub struct Session<X: XpSink, S: LevelStore> {
    /// Tier of the current level.
    difficulty: Difficulty,
    /// Maze being played, mutated in place.
    grid: Grid,
    /// Player position.
    player: Coord,
    /// Current phase.
    mode: Mode,
    /// Whether the door may be crossed. Always set on levels without a key.
    has_key: bool,
    /// Hint cooldown and display timers.
    clock: HintClock,
    /// Source of every random choice made while generating mazes.
    rng: ChaCha8Rng,
    /// Receiver of victory experience.
    xp: X,
    /// Storage for the level to resume from.
    store: S,
    /// Channels receiving snapshots.
    subscribers: Vec<Sender<Snapshot>>,
}

impl<X: XpSink, S: LevelStore> Session<X, S> {
    /// Starts a session on a freshly generated maze of the given level.
    ///
    /// # Errors
    ///
    /// Returns a [`MazeError`] if the maze for the level cannot be generated.
    pub fn new(level: u32, mut rng: ChaCha8Rng, xp: X, store: S) -> Result<Self, MazeError> {
        let difficulty = Difficulty::new(level);
        let grid = build_maze(difficulty, &mut rng)?;

        Self::from_grid(difficulty.level(), grid, rng, xp, store)
    }

    /// Starts a session on a prepared maze.
    ///
    /// The player spawns on the start cell, and holds the key from the outset if the maze has no
    /// key cell. Later restarts and advances generate fresh mazes from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::StartCount`] if the grid has no start cell.
    pub fn from_grid(
        level: u32,
        grid: Grid,
        rng: ChaCha8Rng,
        xp: X,
        store: S,
    ) -> Result<Self, MazeError> {
        let player = grid.find(CellKind::Start).ok_or(MazeError::StartCount(0))?;
        let mut session = Self {
            difficulty: Difficulty::new(level),
            has_key: grid.find(CellKind::Key).is_none(),
            grid,
            player,
            mode: Mode::Playing,
            clock: HintClock::new(),
            rng,
            xp,
            store,
            subscribers: Vec::new(),
        };
        session.reveal();

        info!("level {} started", session.difficulty.level());
        Ok(session)
    }

    /// Applies a command, returning whether it was accepted.
    ///
    /// Rejected commands leave the session untouched. Every accepted command is followed by a
    /// snapshot sent to all subscribers.
    pub fn handle(&mut self, command: Command) -> bool {
        let accepted = match (command, self.mode) {
            (Command::Move(direction), Mode::Playing) => self.move_player(direction),
            (Command::RequestHint, Mode::Playing) => self.request_hint(),
            (Command::Restart, Mode::Playing | Mode::GameOver) => self.load(self.difficulty),
            (Command::AdvanceLevel, Mode::Victory) => self.load(self.difficulty.next()),
            _ => false,
        };

        if accepted {
            self.publish();
        } else {
            debug!("rejected {command:?} while {:?}", self.mode);
        }

        accepted
    }

    /// Advances the hint timers by `elapsed`, returning whether anything visible changed.
    ///
    /// The highlight is cleared once it has been shown for its full duration, and the cooldown
    /// drops once per whole second.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let outcome = self.clock.tick(elapsed);
        if outcome.hint_expired {
            let _ = self.grid.clear_hints();
        }
        if outcome.changed() {
            self.publish();
        }

        outcome.changed()
    }

    /// Registers a new snapshot subscriber. The current state is sent right away.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (sender, receiver) = mpsc::channel();
        if sender.send(self.snapshot()).is_ok() {
            self.subscribers.push(sender);
        }

        receiver
    }

    /// Builds a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.difficulty.level(),
            mode: self.mode,
            player: self.player,
            has_key: self.has_key,
            gated: self.difficulty.is_gated(),
            cooldown_secs: self.clock.cooldown_secs(),
            hint_active: self.clock.hint_active(),
            size: self.grid.size(),
            cells: self.grid.cells().to_vec(),
        }
    }

    /// Returns the current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.difficulty.level()
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the player position.
    #[must_use]
    pub const fn player(&self) -> Coord {
        self.player
    }

    /// Returns whether the door may be crossed.
    #[must_use]
    pub const fn has_key(&self) -> bool {
        self.has_key
    }

    /// Returns the maze being played.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the seconds left before another hint may be requested.
    #[must_use]
    pub const fn cooldown_secs(&self) -> u32 {
        self.clock.cooldown_secs()
    }

    /// Returns whether a hint is currently highlighted.
    #[must_use]
    pub const fn hint_active(&self) -> bool {
        self.clock.hint_active()
    }

    /// Returns the experience sink.
    #[must_use]
    pub const fn xp_sink(&self) -> &X {
        &self.xp
    }

    /// Returns the level store.
    #[must_use]
    pub const fn level_store(&self) -> &S {
        &self.store
    }

    /// Steps the player one cell, resolving whatever lies on the target cell.
    fn move_player(&mut self, direction: Direction) -> bool {
        let Some(target) = self.grid.step(self.player, direction) else {
            return false;
        };

        match self.grid.kind(target) {
            None | Some(CellKind::Wall) => false,
            Some(CellKind::Door) if !self.has_key => false,
            Some(CellKind::Sin) => {
                info!("stepped on a trap at {target} on level {}", self.level());
                self.mode = Mode::GameOver;
                true
            }
            Some(kind) => {
                self.player = target;
                self.reveal();
                self.enter(kind, target);
                true
            }
        }
    }

    /// Applies the effect of the cell the player just entered.
    fn enter(&mut self, kind: CellKind, coord: Coord) {
        match kind {
            CellKind::Key => {
                debug!("picked up the key at {coord}");
                self.has_key = true;
                self.grid.set_kind(coord, CellKind::Path);
            }
            CellKind::Door => {
                if let Some(cell) = self.grid.cell_mut(coord) {
                    cell.unlock();
                }
            }
            CellKind::End => self.win(),
            CellKind::Wall | CellKind::Path | CellKind::Start | CellKind::Sin => {}
        }
    }

    /// Ends the level in victory and reports it to the collaborators.
    fn win(&mut self) {
        let reward = self.difficulty.victory_xp();
        let next = self.difficulty.next().level();
        info!("level {} cleared for {reward} xp", self.level());

        self.mode = Mode::Victory;
        self.xp.award_xp(reward);
        if let Err(err) = self.store.persist_level(next) {
            error!("failed to persist level {next}: {err}");
        }
    }

    /// Highlights the start of the route to the current objective and starts the hint timers.
    fn request_hint(&mut self) -> bool {
        if !self.clock.is_ready() {
            return false;
        }

        let target = if self.has_key {
            CellKind::End
        } else {
            CellKind::Key
        };
        let Some(route) =
            pathfinding::find_path(&self.grid, self.player, target, Passage::Permissive)
        else {
            debug!("no route from {} to {target:?}; hint skipped", self.player);
            return false;
        };

        for coord in route.into_iter().take(HINT_LENGTH) {
            if let Some(cell) = self.grid.cell_mut(coord) {
                if matches!(cell.kind(), CellKind::Path | CellKind::Door) {
                    cell.set_hint(true);
                }
            }
        }
        self.clock.start(self.difficulty.hint_cooldown_secs());

        true
    }

    /// Replaces the maze with a fresh one for the given tier and resets all per-maze state.
    fn load(&mut self, difficulty: Difficulty) -> bool {
        let grid = match build_maze(difficulty, &mut self.rng) {
            Ok(grid) => grid,
            Err(err) => {
                error!("failed to generate level {}: {err}", difficulty.level());
                return false;
            }
        };
        let Some(player) = grid.find(CellKind::Start) else {
            error!("generated level {} has no start cell", difficulty.level());
            return false;
        };

        self.difficulty = difficulty;
        self.has_key = grid.find(CellKind::Key).is_none();
        self.grid = grid;
        self.player = player;
        self.mode = Mode::Playing;
        self.clock.reset();
        self.reveal();

        info!("level {} started", difficulty.level());
        true
    }

    /// Lifts the fog around the player.
    fn reveal(&mut self) {
        let _ = visibility::reveal_around(
            &mut self.grid,
            self.player,
            self.difficulty.reveal_radius(),
        );
    }

    /// Sends the current snapshot to every subscriber, dropping those that hung up.
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}

/// Mazes generated for a tier before settling for one that is missing hazards.
const MAX_MAZE_ATTEMPTS: usize = 4;

/// Generates a complete maze for a tier: carved, braided and with its hazards placed.
///
/// A maze that could not take all of its hazards is thrown away and generated again from the
/// same random source, up to [`MAX_MAZE_ATTEMPTS`] mazes.
fn build_maze(difficulty: Difficulty, rng: &mut ChaCha8Rng) -> Result<Grid, MazeError> {
    let mut grid = generator::generate(difficulty, rng)?;
    let mut report = hazards::place(&mut grid, difficulty, rng);

    for attempt in 2..=MAX_MAZE_ATTEMPTS {
        if report.is_complete(difficulty) {
            return Ok(grid);
        }
        debug!(
            "level {} maze lacks hazards; generating maze {attempt}",
            difficulty.level()
        );
        grid = generator::generate(difficulty, rng)?;
        report = hazards::place(&mut grid, difficulty, rng);
    }

    if !report.is_complete(difficulty) {
        warn!(
            "level {} keeps {} of {} traps after {MAX_MAZE_ATTEMPTS} mazes",
            difficulty.level(),
            report.traps.len(),
            report.wanted_traps
        );
    }

    Ok(grid)
}
