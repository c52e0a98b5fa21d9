//! Pathfinding module.
//!
//! This module contains the breadth-first search used everywhere the engine needs to know how to
//! get from one cell to another: solvability checks while generating, hazard placement, and the
//! hint shown to the player.

use std::collections::{HashSet, VecDeque};

use crate::grid::{CellKind, Coord, Grid};

/// Rule deciding which cells a search may walk through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Passage {
    /// Everything except walls and traps is walkable, doors included.
    ///
    /// This is the rule used for solvability and for hints; it assumes the key can be reached
    /// before the door.
    Permissive,
    /// Like [`Passage::Permissive`], but doors block the way.
    Strict,
}

impl Passage {
    /// Returns whether a cell of the given kind can be walked through under this rule.
    #[must_use]
    pub const fn allows(self, kind: CellKind) -> bool {
        match kind {
            CellKind::Wall | CellKind::Sin => false,
            CellKind::Door => matches!(self, Self::Permissive),
            CellKind::Path | CellKind::Start | CellKind::End | CellKind::Key => true,
        }
    }
}

/// Finds the shortest route from `start` to the nearest cell of kind `target`.
///
/// The returned route lists every cell to step on, in order, excluding `start` itself and ending
/// with the target cell. An empty route means `start` already holds the target kind. [`None`] is
/// returned when no cell of that kind can be reached.
#[must_use]
pub fn find_path(
    grid: &Grid,
    start: Coord,
    target: CellKind,
    passage: Passage,
) -> Option<Vec<Coord>> {
    let start_idx = grid.index(start)?;
    let mut parents: Vec<Option<Coord>> = vec![None; grid.cells().len()];
    let mut visited = vec![false; grid.cells().len()];
    let mut queue = VecDeque::new();

    *visited.get_mut(start_idx)? = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if grid.kind(current) == Some(target) {
            return Some(trace_back(grid, &parents, start, current));
        }

        for neighbor in grid.neighbors(current) {
            let Some(idx) = grid.index(neighbor) else {
                continue;
            };
            let walkable = grid.kind(neighbor).is_some_and(|kind| passage.allows(kind));
            match visited.get_mut(idx) {
                Some(seen) if walkable && !*seen => *seen = true,
                _ => continue,
            }
            if let Some(parent) = parents.get_mut(idx) {
                *parent = Some(current);
            }
            queue.push_back(neighbor);
        }
    }

    None
}

/// Rebuilds the route ending at `end` by following parent links back to `start`.
fn trace_back(grid: &Grid, parents: &[Option<Coord>], start: Coord, end: Coord) -> Vec<Coord> {
    let mut route = Vec::new();
    let mut current = end;

    while current != start {
        route.push(current);
        match grid
            .index(current)
            .and_then(|idx| parents.get(idx).copied().flatten())
        {
            Some(parent) => current = parent,
            None => break,
        }
    }
    route.reverse();

    route
}

/// Collects every cell reachable from `start` under the given rule, `start` included.
#[must_use]
pub fn reachable(grid: &Grid, start: Coord, passage: Passage) -> HashSet<Coord> {
    let mut seen = HashSet::new();
    if !grid.contains(start) {
        return seen;
    }

    let mut queue = VecDeque::from([start]);
    let _ = seen.insert(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in grid.neighbors(current) {
            let walkable = grid.kind(neighbor).is_some_and(|kind| passage.allows(kind));
            if walkable && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    seen
}

/// Returns the current solution: the permissive route from the start cell to the exit.
#[must_use]
pub fn solution(grid: &Grid) -> Option<Vec<Coord>> {
    let start = grid.find(CellKind::Start)?;
    find_path(grid, start, CellKind::End, Passage::Permissive)
}

/// Returns whether the exit can be reached from the start cell without crossing walls or traps.
#[must_use]
pub fn is_solvable(grid: &Grid) -> bool {
    solution(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a grid from a layout, panicking on malformed test fixtures.
    fn layout(text: &str) -> Grid {
        Grid::parse(text).expect("test layout should parse")
    }

    #[test]
    fn test_find_path_excludes_start_and_ends_on_target() {
        let grid = layout(
            "\
#####
#S..#
###.#
#E..#
#####",
        );

        let route = find_path(&grid, Coord::new(1, 1), CellKind::End, Passage::Permissive)
            .expect("exit should be reachable");

        assert_eq!(
            route,
            vec![
                Coord::new(2, 1),
                Coord::new(3, 1),
                Coord::new(3, 2),
                Coord::new(3, 3),
                Coord::new(2, 3),
                Coord::new(1, 3)
            ]
        );
    }

    #[test]
    fn test_find_path_prefers_shortest_route() {
        let grid = layout(
            "\
#######
#S....#
#.###.#
#.....#
#.###.#
#....E#
#######",
        );

        let route = solution(&grid).expect("exit should be reachable");

        assert_eq!(route.len(), 8, "manhattan distance from (1,1) to (5,5) is 8");
        assert_eq!(route.last(), Some(&Coord::new(5, 5)));
    }

    #[test]
    fn test_find_path_on_target_returns_empty_route() {
        let grid = layout("###\n#S#\n#E#");

        let route = find_path(&grid, Coord::new(1, 2), CellKind::End, Passage::Permissive);

        assert_eq!(route, Some(Vec::new()));
    }

    #[test]
    fn test_traps_and_walls_block_the_search() {
        let grid = layout(
            "\
#####
#SX.#
#.###
#..E#
#####",
        );

        let route = solution(&grid).expect("exit should be reachable around the trap");
        assert!(
            !route.contains(&Coord::new(2, 1)),
            "route should never cross the trap"
        );

        let sealed = layout(
            "\
#####
#S#.#
#X#.#
#..E#
#####",
        );
        assert!(!is_solvable(&sealed), "trap should seal the only corridor");
    }

    #[test]
    fn test_passage_rules_on_doors() {
        let grid = layout(
            "\
#####
#S.D#
###E#
#####
#####",
        );

        assert!(is_solvable(&grid), "permissive search should cross the door");
        assert_eq!(
            find_path(&grid, Coord::new(1, 1), CellKind::End, Passage::Strict),
            None
        );
    }

    #[test]
    fn test_reachable_respects_passage() {
        let grid = layout(
            "\
#####
#S.D#
#.#E#
#K###
#####",
        );

        let strict = reachable(&grid, Coord::new(1, 1), Passage::Strict);
        let permissive = reachable(&grid, Coord::new(1, 1), Passage::Permissive);

        assert_eq!(strict.len(), 4, "start, two corridors and the key");
        assert!(strict.contains(&Coord::new(1, 3)), "key should be reachable");
        assert!(!strict.contains(&Coord::new(3, 1)), "door should block");
        assert_eq!(permissive.len(), 6, "door and exit join the region");
    }

    #[test]
    fn test_reachable_outside_grid_is_empty() {
        let grid = layout("###\n#S#\n#E#");

        assert!(reachable(&grid, Coord::new(9, 9), Passage::Permissive).is_empty());
        assert_eq!(
            find_path(&grid, Coord::new(9, 9), CellKind::End, Passage::Permissive),
            None
        );
    }
}
