//! Hazard placement.
//!
//! Traps go on the solution path so the player has to find a way around them, and from the gated
//! tier on a door is put in front of the exit with its key somewhere in the maze. Every change
//! made here is checked against the pathfinder: the exit stays reachable from the spawn after
//! each trap, and the key is always reachable without crossing the door.

use log::{debug, warn};
use rand::{seq::SliceRandom as _, Rng};

use crate::{
    difficulty::{Difficulty, SPAWN_SAFE_SUM},
    grid::{CellKind, Coord, Grid, START},
    pathfinding::{self, Passage},
};

/// Traps are only placed when the initial solution is longer than this many cells.
pub const MIN_TRAP_PATH_LEN: usize = 5;

/// Random trap positions tried before falling back to a sweep of the solution window.
const MAX_TRAP_ROLLS: usize = 32;

/// Summary of the hazards placed on a maze.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardReport {
    /// Trap cells, in placement order.
    pub traps: Vec<Coord>,
    /// Traps the maze had room for, out of those the tier asked for.
    pub wanted_traps: usize,
    /// Key cell, if the tier is gated.
    pub key: Option<Coord>,
    /// Door cell, if one could be put next to the exit.
    pub door: Option<Coord>,
}

impl HazardReport {
    /// Returns whether every trap the maze had room for was placed, along with the key and door of
    /// a gated tier.
    #[must_use]
    pub fn is_complete(&self, difficulty: Difficulty) -> bool {
        self.traps.len() == self.wanted_traps
            && (!difficulty.is_gated() || (self.key.is_some() && self.door.is_some()))
    }
}

/// Places every hazard the difficulty tier asks for.
///
/// Traps come first so the key never lands behind one.
pub fn place<R: Rng + ?Sized>(
    grid: &mut Grid,
    difficulty: Difficulty,
    rng: &mut R,
) -> HazardReport {
    let wanted_traps = trap_capacity(grid, difficulty.trap_count());
    let traps = place_traps(grid, wanted_traps, rng);
    let (key, door) = if difficulty.is_gated() {
        place_key_and_door(grid, rng)
    } else {
        (None, None)
    };

    debug!(
        "level {} hazards: {} traps, key {key:?}, door {door:?}",
        difficulty.level(),
        traps.len()
    );

    HazardReport {
        traps,
        wanted_traps,
        key,
        door,
    }
}

/// Caps a trap count at the size of the solution window, the most traps a maze can hold.
///
/// Returns zero when the solution is too short for traps at all.
#[must_use]
pub fn trap_capacity(grid: &Grid, count: usize) -> usize {
    match pathfinding::solution(grid) {
        Some(route) if route.len() > MIN_TRAP_PATH_LEN => count.min(trap_window(route.len()).len()),
        _ => 0,
    }
}

/// Places up to `count` traps on the solution path, returning their positions.
///
/// The count is capped by [`trap_capacity`]. Each trap recomputes the solution first, since
/// earlier traps reroute it. Placement stops at the first trap that fits nowhere without sealing
/// the exit.
pub fn place_traps<R: Rng + ?Sized>(grid: &mut Grid, count: usize, rng: &mut R) -> Vec<Coord> {
    if count == 0 {
        return Vec::new();
    }

    let route_len = match pathfinding::solution(grid) {
        Some(route) if route.len() > MIN_TRAP_PATH_LEN => route.len(),
        Some(route) => {
            debug!("solution of {} cells is too short for traps", route.len());
            return Vec::new();
        }
        None => {
            warn!("maze is unsolvable before traps; skipping them");
            return Vec::new();
        }
    };

    let count = count.min(trap_window(route_len).len());
    let mut traps = Vec::with_capacity(count);
    for placed in 0..count {
        let Some(trap) = place_trap(grid, rng) else {
            warn!("no safe position left for trap {} of {count}", placed + 1);
            break;
        };
        traps.push(trap);
    }

    traps
}

/// Places a single trap, re-rolling its position until the exit stays reachable.
fn place_trap<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Coord> {
    for _ in 0..MAX_TRAP_ROLLS {
        let route = pathfinding::solution(grid)?;
        let window = trap_window(route.len());
        if window.is_empty() {
            return None;
        }

        let Some(&candidate) = route.get(rng.gen_range(window)) else {
            continue;
        };
        if try_trap(grid, candidate, rng) {
            return Some(candidate);
        }
    }

    let route = pathfinding::solution(grid)?;
    let window = trap_window(route.len());
    route
        .get(window)?
        .iter()
        .copied()
        .find(|&candidate| try_trap(grid, candidate, rng))
}

/// Returns the index range covering the middle 40% of a route, from 30% to 70% of its length.
const fn trap_window(len: usize) -> std::ops::Range<usize> {
    (len * 3 / 10)..(len * 7 / 10)
}

/// Returns whether a trap may sit on the given cell without crowding the spawn.
#[must_use]
pub fn is_spawn_safe(coord: Coord) -> bool {
    coord != START && coord.x + coord.y > SPAWN_SAFE_SUM
}

/// Turns a candidate into a trap if that keeps the maze solvable, carving a detour if needed.
///
/// On failure the candidate is restored and the grid is left as it was.
fn try_trap<R: Rng + ?Sized>(grid: &mut Grid, candidate: Coord, rng: &mut R) -> bool {
    if !is_spawn_safe(candidate) || grid.kind(candidate) != Some(CellKind::Path) {
        return false;
    }

    grid.set_kind(candidate, CellKind::Sin);
    if pathfinding::is_solvable(grid) || carve_detour(grid, candidate, rng) {
        return true;
    }

    grid.set_kind(candidate, CellKind::Path);
    false
}

/// Opens one wall next to a trap so the exit becomes reachable again.
///
/// Wall neighbours are tried one at a time in random order, and each carve is kept only if the
/// maze is solvable afterwards. Returns whether a detour was found.
pub fn carve_detour<R: Rng + ?Sized>(grid: &mut Grid, trap: Coord, rng: &mut R) -> bool {
    let mut walls: Vec<Coord> = grid
        .neighbors(trap)
        .filter(|&wall| grid.is_interior(wall) && grid.kind(wall) == Some(CellKind::Wall))
        .collect();
    walls.shuffle(rng);

    for wall in walls {
        grid.set_kind(wall, CellKind::Path);
        if pathfinding::is_solvable(grid) {
            debug!("carved detour at {wall} around trap at {trap}");
            return true;
        }
        grid.set_kind(wall, CellKind::Wall);
    }

    false
}

/// Places the door next to the exit and the key somewhere the player can reach without it.
///
/// The door goes on the first open cell found among the one left of the exit and the one above
/// it. The key goes on a uniformly random open cell reachable from the spawn with the door
/// closed. If either one cannot be placed the other is removed again, so key and door only ever
/// come as a pair.
pub fn place_key_and_door<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
) -> (Option<Coord>, Option<Coord>) {
    let door = place_door(grid);
    let key = place_key(grid, rng);

    match (key, door) {
        (None, Some(door)) => {
            warn!("no reachable cell for the key; removing door at {door}");
            grid.set_kind(door, CellKind::Path);
            (None, None)
        }
        (Some(key), None) => {
            warn!("no open cell next to the exit for a door; removing key at {key}");
            grid.set_kind(key, CellKind::Path);
            (None, None)
        }
        placed => placed,
    }
}

/// Locks the first open cell left of or above the exit.
fn place_door(grid: &mut Grid) -> Option<Coord> {
    let end = grid.find(CellKind::End)?;
    let door = [grid.offset(end, -1, 0), grid.offset(end, 0, -1)]
        .into_iter()
        .flatten()
        .find(|&coord| grid.kind(coord) == Some(CellKind::Path))?;

    grid.set_kind(door, CellKind::Door);
    Some(door)
}

/// Puts the key on a random open cell reachable from the spawn without crossing the door.
fn place_key<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Coord> {
    let start = grid.find(CellKind::Start)?;
    let region = pathfinding::reachable(grid, start, Passage::Strict);
    let candidates: Vec<Coord> = grid
        .coords()
        .filter(|coord| grid.kind(*coord) == Some(CellKind::Path) && region.contains(coord))
        .collect();

    let key = *candidates.choose(rng)?;
    grid.set_kind(key, CellKind::Key);
    Some(key)
}
