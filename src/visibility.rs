//! Fog of war.

use crate::grid::{Coord, Grid};

/// Reveals every cell within `radius` of `center`, measured as a Euclidean distance.
///
/// Only the bounding box of the circle is scanned. Cells are never hidden again, so repeated
/// calls only ever grow the revealed area. Returns how many cells were newly revealed.
pub fn reveal_around(grid: &mut Grid, center: Coord, radius: usize) -> usize {
    let limit = radius.saturating_mul(radius);
    let last = grid.size().saturating_sub(1);
    let xs = center.x.saturating_sub(radius)..=center.x.saturating_add(radius).min(last);
    let ys = center.y.saturating_sub(radius)..=center.y.saturating_add(radius).min(last);

    let mut revealed = 0;
    for y in ys {
        for x in xs.clone() {
            let coord = Coord::new(x, y);
            if coord.distance_squared(center) > limit {
                continue;
            }
            if grid.cell_mut(coord).is_some_and(|cell| cell.reveal()) {
                revealed += 1;
            }
        }
    }

    revealed
}
