//! Grid model for the maze.
//!
//! This module contains the square cell matrix every other part of the engine works on, together
//! with the coordinate and direction types used to address it. It also holds the plain-text layout
//! format used to describe hand-made mazes, in the same spirit as the map strings the terminal
//! frontend used to load.

use std::fmt;

use thiserror::Error;

/// Coordinate at which every generated maze starts carving and where the player spawns.
pub const START: Coord = Coord::new(1, 1);

/// Grid cell coordinate.
///
/// The `x` component is the column and the `y` component the row, both counted from the top-left
/// corner of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
}

impl Coord {
    /// Builds a coordinate from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Shifts the coordinate by a signed offset.
    ///
    /// Returns [`None`] when the shift would leave the non-negative quadrant. Upper bounds are not
    /// checked here; see [`Grid::offset`] for that.
    #[must_use]
    pub const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    /// Returns the cell halfway between two coordinates on the same row or column.
    ///
    /// This is the wall cell separating two lattice cells that sit two steps apart.
    #[must_use]
    pub const fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }

    /// Returns the squared Euclidean distance to another coordinate.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> usize {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);

        dx * dx + dy * dy
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    /// All four directions, in the order the search and carving algorithms visit them.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the `(dx, dy)` unit offset of the direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Kind of content held by a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Solid rock; never walkable.
    Wall,
    /// Open corridor.
    Path,
    /// Player spawn.
    Start,
    /// Maze exit.
    End,
    /// Key that opens the door.
    Key,
    /// Door guarding the exit; walkable only while holding the key.
    Door,
    /// Trap that ends the run when entered.
    Sin,
}

impl CellKind {
    /// Returns the layout symbol used by [`Grid::parse`] and the [`Display`](fmt::Display)
    /// implementation of [`Grid`].
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Path => '.',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Key => 'K',
            Self::Door => 'D',
            Self::Sin => 'X',
        }
    }

    /// Maps a layout symbol back to its kind.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Path),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            'K' => Some(Self::Key),
            'D' => Some(Self::Door),
            'X' => Some(Self::Sin),
            _ => None,
        }
    }
}

/// Errors raised when a grid cannot be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The requested side length was zero.
    #[error("grid size must be positive")]
    Empty,
    /// The requested side length cannot hold a walled maze with distinct start and exit.
    #[error("grid size {size} is too small for a maze (minimum {min})")]
    TooSmall {
        /// Requested side length.
        size: usize,
        /// Smallest side length the generator accepts.
        min: usize,
    },
    /// A layout row does not match the number of rows.
    #[error("layout row {row} has {width} cells, expected {expected}")]
    NotSquare {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells found in that row.
        width: usize,
        /// Number of cells every row must have.
        expected: usize,
    },
    /// A layout contains a character that does not name a cell kind.
    #[error("unknown layout symbol {symbol:?} at {x}, {y}")]
    UnknownSymbol {
        /// The character found.
        symbol: char,
        /// Column of the character.
        x: usize,
        /// Row of the character.
        y: usize,
    },
    /// A layout does not hold exactly one start cell.
    #[error("expected exactly one start cell, found {0}")]
    StartCount(usize),
    /// A layout does not hold exactly one exit cell.
    #[error("expected exactly one exit cell, found {0}")]
    EndCount(usize),
    /// The carved maze had no open cell left to hold the exit.
    #[error("carved maze has no open cell for the exit")]
    NoExit,
}

/// Single maze cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Position of the cell in its grid.
    coord: Coord,
    /// Current content of the cell.
    kind: CellKind,
    /// Fog-of-war flag. Once set it stays set for the lifetime of the grid.
    revealed: bool,
    /// Transient hint highlight.
    hint: bool,
    /// Lock state; only meaningful while the cell is a door.
    locked: bool,
}

impl Cell {
    /// Builds a hidden wall cell at the given position.
    const fn wall(coord: Coord) -> Self {
        Self {
            coord,
            kind: CellKind::Wall,
            revealed: false,
            hint: false,
            locked: false,
        }
    }

    /// Returns the position of the cell.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Returns the content of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Returns whether the fog has been lifted from this cell.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Returns whether the cell is part of the currently displayed hint.
    #[must_use]
    pub const fn is_hinted(&self) -> bool {
        self.hint
    }

    /// Returns the lock state of a door, or [`None`] for any other kind of cell.
    #[must_use]
    pub const fn locked(&self) -> Option<bool> {
        if matches!(self.kind, CellKind::Door) {
            Some(self.locked)
        } else {
            None
        }
    }

    /// Changes the content of the cell. Doors always start locked.
    pub(crate) fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
        self.locked = matches!(kind, CellKind::Door);
    }

    /// Lifts the fog from the cell, returning whether it was hidden before.
    pub(crate) fn reveal(&mut self) -> bool {
        let hidden = !self.revealed;
        self.revealed = true;
        hidden
    }

    /// Sets or clears the hint highlight.
    pub(crate) fn set_hint(&mut self, hint: bool) {
        self.hint = hint;
    }

    /// Opens a door cell.
    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }
}

/// Square matrix of maze cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Side length of the grid.
    size: usize,
    /// Cells, row after row.
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a `size` by `size` grid filled with hidden walls.
    ///
    /// # Errors
    ///
    /// - [`MazeError::Empty`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, MazeError> {
        if size == 0 {
            return Err(MazeError::Empty);
        }

        let cells = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell::wall(Coord::new(x, y))))
            .collect();

        Ok(Self { size, cells })
    }

    /// Builds a grid from its text layout.
    ///
    /// Each line is a row and each character a cell, using the symbols from
    /// [`CellKind::symbol`]. Leading and trailing blank space around the whole layout is ignored.
    /// The layout must be square and hold exactly one start and one exit. Parsed cells start
    /// hidden, and any door starts locked.
    ///
    /// # Errors
    ///
    /// - [`MazeError::Empty`] for an empty layout.
    /// - [`MazeError::NotSquare`] if a row width differs from the row count.
    /// - [`MazeError::UnknownSymbol`] for characters outside the layout alphabet.
    /// - [`MazeError::StartCount`] and [`MazeError::EndCount`] for a missing or duplicated start
    ///   or exit.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = layout.trim().lines().map(str::trim).collect();
        let mut grid = Self::new(rows.len())?;

        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != grid.size {
                return Err(MazeError::NotSquare {
                    row: y,
                    width,
                    expected: grid.size,
                });
            }

            for (x, symbol) in row.chars().enumerate() {
                let kind =
                    CellKind::from_symbol(symbol).ok_or(MazeError::UnknownSymbol { symbol, x, y })?;
                grid.set_kind(Coord::new(x, y), kind);
            }
        }

        match (grid.count(CellKind::Start), grid.count(CellKind::End)) {
            (1, 1) => Ok(grid),
            (1, ends) => Err(MazeError::EndCount(ends)),
            (starts, _) => Err(MazeError::StartCount(starts)),
        }
    }

    /// Returns the side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.size && coord.y < self.size
    }

    /// Returns whether the coordinate lies inside the grid and off its outer ring.
    #[must_use]
    pub const fn is_interior(&self, coord: Coord) -> bool {
        coord.x > 0 && coord.y > 0 && coord.x + 1 < self.size && coord.y + 1 < self.size
    }

    /// Returns the row-major index of a coordinate, if it lies inside the grid.
    #[must_use]
    pub const fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y * self.size + coord.x)
        } else {
            None
        }
    }

    /// Returns the cell at a coordinate.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|idx| self.cells.get(idx))
    }

    /// Returns a mutable reference to the cell at a coordinate.
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Returns the kind of the cell at a coordinate.
    #[must_use]
    pub fn kind(&self, coord: Coord) -> Option<CellKind> {
        self.cell(coord).map(Cell::kind)
    }

    /// Changes the kind of the cell at a coordinate. Out-of-bounds coordinates are ignored.
    pub(crate) fn set_kind(&mut self, coord: Coord, kind: CellKind) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_kind(kind);
        }
    }

    /// Shifts a coordinate by a signed offset, staying inside the grid.
    #[must_use]
    pub const fn offset(&self, coord: Coord, dx: isize, dy: isize) -> Option<Coord> {
        match coord.offset(dx, dy) {
            Some(shifted) if self.contains(shifted) => Some(shifted),
            _ => None,
        }
    }

    /// Returns the in-bounds neighbour of a coordinate in the given direction.
    #[must_use]
    pub const fn step(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        self.offset(coord, dx, dy)
    }

    /// Enumerates the in-bounds cardinal neighbours of a coordinate.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(coord, direction))
    }

    /// Enumerates every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Coord::new(x, y)))
    }

    /// Returns the first coordinate, in row-major order, holding the given kind.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<Coord> {
        self.cells
            .iter()
            .find(|cell| cell.kind == kind)
            .map(Cell::coord)
    }

    /// Counts the cells holding the given kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    /// Clears every hint highlight, returning how many cells were highlighted.
    pub(crate) fn clear_hints(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.hint) {
            cell.hint = false;
            cleared += 1;
        }

        cleared
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(|cell| cell.kind.symbol()).collect();
            writeln!(formatter, "{line}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small hand-made layout shared by the tests in this module.
    const LAYOUT: &str = "\
#####
#S.D#
#K#E#
#X..#
#####";

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(Grid::new(0), Err(MazeError::Empty));
    }

    #[test]
    fn test_new_fills_with_hidden_walls() {
        let grid = Grid::new(11).expect("failed to allocate grid");

        assert_eq!(grid.size(), 11);
        assert_eq!(grid.cells().len(), 121);
        assert_eq!(grid.count(CellKind::Wall), 121);
        assert!(
            grid.cells().iter().all(|cell| !cell.is_revealed() && !cell.is_hinted()),
            "fresh grid cells should be hidden and unhinted"
        );
    }

    #[test]
    fn test_cells_know_their_coordinates() {
        let grid = Grid::new(5).expect("failed to allocate grid");

        for coord in grid.coords() {
            let cell = grid.cell(coord).expect("coordinate should be in bounds");
            assert_eq!(cell.coord(), coord);
        }
    }

    #[test]
    fn test_bounds_checks() {
        let grid = Grid::new(5).expect("failed to allocate grid");

        assert!(grid.contains(Coord::new(4, 4)), "corner should be inside");
        assert!(!grid.contains(Coord::new(5, 0)), "column 5 should be outside");
        assert!(grid.cell(Coord::new(0, 5)).is_none(), "row 5 should be outside");
        assert!(grid.is_interior(Coord::new(1, 3)), "(1, 3) should be interior");
        assert!(!grid.is_interior(Coord::new(0, 2)), "left ring should not be interior");
        assert!(!grid.is_interior(Coord::new(2, 4)), "bottom ring should not be interior");
        assert_eq!(grid.offset(Coord::new(0, 0), -1, 0), None);
        assert_eq!(grid.offset(Coord::new(4, 4), 1, 0), None);
        assert_eq!(grid.offset(Coord::new(1, 1), 2, 0), Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_neighbors_corner_and_center() {
        let grid = Grid::new(5).expect("failed to allocate grid");

        let corner: Vec<Coord> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corner, vec![Coord::new(0, 1), Coord::new(1, 0)]);

        let center: Vec<Coord> = grid.neighbors(Coord::new(2, 2)).collect();
        assert_eq!(
            center,
            vec![
                Coord::new(2, 1),
                Coord::new(2, 3),
                Coord::new(1, 2),
                Coord::new(3, 2)
            ]
        );
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let grid = Grid::parse(LAYOUT).expect("layout should parse");

        assert_eq!(grid.size(), 5);
        assert_eq!(grid.find(CellKind::Start), Some(Coord::new(1, 1)));
        assert_eq!(grid.find(CellKind::End), Some(Coord::new(3, 2)));
        assert_eq!(grid.kind(Coord::new(1, 3)), Some(CellKind::Sin));
        assert_eq!(grid.to_string().trim_end(), LAYOUT);
    }

    #[test]
    fn test_parse_doors_start_locked() {
        let grid = Grid::parse(LAYOUT).expect("layout should parse");

        let door = grid.cell(Coord::new(3, 1)).expect("door should exist");
        assert_eq!(door.locked(), Some(true));
        let path = grid.cell(Coord::new(2, 1)).expect("path should exist");
        assert_eq!(path.locked(), None);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let result = Grid::parse("#####\n#S.E#\n###\n#####\n#####");

        assert_eq!(
            result,
            Err(MazeError::NotSquare {
                row: 2,
                width: 3,
                expected: 5
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        let result = Grid::parse("###\n#S?\n#E#");

        assert_eq!(
            result,
            Err(MazeError::UnknownSymbol {
                symbol: '?',
                x: 2,
                y: 1
            })
        );
    }

    #[test]
    fn test_parse_requires_single_start_and_end() {
        assert_eq!(Grid::parse("###\n#.#\n#E#"), Err(MazeError::StartCount(0)));
        assert_eq!(Grid::parse("###\n#S#\n#S#"), Err(MazeError::StartCount(2)));
        assert_eq!(Grid::parse("###\n#S#\n#.#"), Err(MazeError::EndCount(0)));
        assert_eq!(Grid::parse(""), Err(MazeError::Empty));
    }

    #[test]
    fn test_set_kind_relocks_doors() {
        let mut grid = Grid::parse(LAYOUT).expect("layout should parse");
        let door = Coord::new(3, 1);

        grid.cell_mut(door).expect("door should exist").unlock();
        assert_eq!(grid.cell(door).and_then(Cell::locked), Some(false));

        grid.set_kind(door, CellKind::Path);
        grid.set_kind(door, CellKind::Door);
        assert_eq!(grid.cell(door).and_then(Cell::locked), Some(true));
    }

    #[test]
    fn test_clear_hints_counts_cleared_cells() {
        let mut grid = Grid::parse(LAYOUT).expect("layout should parse");
        for coord in [Coord::new(2, 1), Coord::new(2, 3)] {
            grid.cell_mut(coord).expect("cell should exist").set_hint(true);
        }

        assert_eq!(grid.clear_hints(), 2);
        assert_eq!(grid.clear_hints(), 0);
    }

    #[test]
    fn test_coord_helpers() {
        let origin = Coord::new(1, 1);

        assert_eq!(origin.midpoint(Coord::new(3, 1)), Coord::new(2, 1));
        assert_eq!(origin.distance_squared(Coord::new(4, 5)), 25);
        assert_eq!(origin.offset(-2, 0), None);
        assert_eq!(format!("{origin}"), "(1, 1)");
    }
}
