//! Maze generation.
//!
//! Mazes are carved on the odd lattice of a wall-filled grid with a randomised depth-first
//! backtracker, which yields a spanning tree over the lattice. From level two on, the tree is
//! braided: dead ends are opened into a neighbouring corridor and other lattice cells get a loop
//! with a level-dependent chance. The exit goes on the open cell closest to the bottom-right
//! corner and the spawn on [`START`].
//!
//! All randomness comes from the generator handed in by the caller, so a seeded generator always
//! carves the same maze.

use log::debug;
use rand::{seq::SliceRandom as _, Rng};

use crate::{
    difficulty::Difficulty,
    grid::{CellKind, Coord, Grid, MazeError, START},
};

/// Smallest grid that fits a start and a distinct exit inside its outer wall ring.
pub const MIN_MAZE_SIZE: usize = 5;

/// Offsets from a lattice cell to its four lattice neighbours.
const LATTICE_STEPS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Generates the bare maze for a difficulty tier: carved, braided, with exit and spawn placed.
///
/// Hazards are not placed here; see [`crate::hazards::place`].
///
/// # Errors
///
/// - [`MazeError::TooSmall`] if the tier asks for a grid below [`MIN_MAZE_SIZE`].
/// - [`MazeError::NoExit`] if no open cell is left for the exit.
pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Result<Grid, MazeError> {
    let size = difficulty.grid_size();
    if size < MIN_MAZE_SIZE {
        return Err(MazeError::TooSmall {
            size,
            min: MIN_MAZE_SIZE,
        });
    }

    let mut grid = Grid::new(size)?;
    carve(&mut grid, rng);
    if difficulty.braids() {
        let loops = braid(&mut grid, difficulty.braid_chance(), rng);
        debug!("braided level {} maze with {loops} loops", difficulty.level());
    }

    let end = place_end(&mut grid).ok_or(MazeError::NoExit)?;
    grid.set_kind(START, CellKind::Start);
    debug!("carved {size}x{size} maze, exit at {end}");

    Ok(grid)
}

/// Carves a spanning tree over the odd lattice, starting from [`START`].
///
/// Each step picks a random lattice cell two steps away from the top of the stack that has not
/// been carved yet, opens both the wall in between and the cell itself, and pushes it. The stack
/// pops when no such cell remains, and carving ends when it is empty.
pub fn carve<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    if !grid.is_interior(START) {
        return;
    }

    grid.set_kind(START, CellKind::Path);
    let mut stack = vec![START];

    while let Some(&current) = stack.last() {
        let unvisited: Vec<Coord> = lattice_neighbors(grid, current)
            .filter(|&next| grid.kind(next) == Some(CellKind::Wall))
            .collect();

        if let Some(&next) = unvisited.choose(rng) {
            grid.set_kind(current.midpoint(next), CellKind::Path);
            grid.set_kind(next, CellKind::Path);
            stack.push(next);
        } else {
            let _ = stack.pop();
        }
    }
}

/// Adds loop connections to a carved maze, returning how many walls were opened.
///
/// Every open lattice cell is visited in row-major order. A dead end (exactly one open
/// connection) is always joined to another neighbour; any other cell is joined with probability
/// `chance`. The wall opened is picked at random among those still separating the cell from an
/// open lattice neighbour.
pub fn braid<R: Rng + ?Sized>(grid: &mut Grid, chance: f64, rng: &mut R) -> usize {
    let chance = chance.clamp(0.0, 1.0);
    let mut opened = 0;

    for y in (1..grid.size().saturating_sub(1)).step_by(2) {
        for x in (1..grid.size().saturating_sub(1)).step_by(2) {
            let cell = Coord::new(x, y);
            if grid.kind(cell) != Some(CellKind::Path) {
                continue;
            }

            let connections = lattice_neighbors(grid, cell)
                .filter(|&next| grid.kind(cell.midpoint(next)) != Some(CellKind::Wall))
                .count();
            if connections != 1 && !rng.gen_bool(chance) {
                continue;
            }

            let walls: Vec<Coord> = lattice_neighbors(grid, cell)
                .filter(|&next| grid.kind(next) == Some(CellKind::Path))
                .map(|next| cell.midpoint(next))
                .filter(|&wall| grid.kind(wall) == Some(CellKind::Wall))
                .collect();
            if let Some(&wall) = walls.choose(rng) {
                grid.set_kind(wall, CellKind::Path);
                opened += 1;
            }
        }
    }

    opened
}

/// Marks the exit, scanning backwards in row-major order from the bottom-right interior corner
/// until an open cell is found.
pub fn place_end(grid: &mut Grid) -> Option<Coord> {
    let last = grid.size().checked_sub(2)?;
    let end = (1..=last)
        .rev()
        .flat_map(|y| (1..=last).rev().map(move |x| Coord::new(x, y)))
        .find(|&coord| grid.kind(coord) == Some(CellKind::Path))?;

    grid.set_kind(end, CellKind::End);
    Some(end)
}

/// Enumerates the interior lattice cells two steps away from a cell.
fn lattice_neighbors(grid: &Grid, cell: Coord) -> impl Iterator<Item = Coord> + '_ {
    LATTICE_STEPS
        .into_iter()
        .filter_map(move |(dx, dy)| grid.offset(cell, dx, dy))
        .filter(move |&next| grid.is_interior(next))
}
