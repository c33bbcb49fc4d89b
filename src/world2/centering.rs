//! Move the landmass so its bounding box sits at the map center.

use log::debug;

use super::state::World;
use super::tile::{stamp_fixed_border, Grid, Tile, TileType, BORDER};

fn is_centered_land(tile: &Tile) -> bool {
    matches!(tile.kind, TileType::Soil | TileType::Transit)
}

/// Bounding box (min_x, min_y, max_x, max_y) of soil and transit tiles.
pub fn land_bounds(grid: &Grid) -> Option<(i32, i32, i32, i32)> {
    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for (x, y, tile) in grid.iter() {
        if !is_centered_land(tile) {
            continue;
        }
        let (x, y) = (x as i32, y as i32);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

/// Offset that centers `bounds`, clamped so nothing enters the border.
pub fn centering_offset(width: usize, height: usize, bounds: (i32, i32, i32, i32)) -> (i32, i32) {
    let (w, h) = (width as i32, height as i32);
    let (min_x, min_y, max_x, max_y) = bounds;
    let mut sx = w / 2 - (min_x + max_x) / 2;
    let mut sy = h / 2 - (min_y + max_y) / 2;

    if min_x + sx < BORDER {
        sx = BORDER - min_x;
    }
    if max_x + sx > w - BORDER - 1 {
        sx = (w - BORDER - 1) - max_x;
    }
    if min_y + sy < BORDER {
        sy = BORDER - min_y;
    }
    if max_y + sy > h - BORDER - 1 {
        sy = (h - BORDER - 1) - max_y;
    }
    (sx, sy)
}

/// Rebuild the grid with land translated to the center. Everything that
/// is not land becomes variable ocean, then the border is re-stamped.
/// Returns the applied offset, or `None` when there is no land.
pub fn center_land(world: &mut World) -> Option<(i32, i32)> {
    let bounds = land_bounds(&world.grid)?;
    let (sx, sy) = centering_offset(world.width(), world.height(), bounds);

    let mut centered = Grid::new_with(world.width(), world.height(), Tile::default());
    for (x, y, tile) in world.grid.iter() {
        if !is_centered_land(tile) {
            continue;
        }
        let (nx, ny) = (x as i32 + sx, y as i32 + sy);
        if let Some(slot) = centered.get_mut_i(nx, ny) {
            *slot = *tile;
        }
    }
    stamp_fixed_border(&mut centered);
    world.grid = centered;

    for i in 0..world.state.walkers.len() {
        let (wx, wy) = world.state.walkers.position(i);
        world.state.walkers.set(i, wx + sx, wy + sy);
    }
    debug!("centered land by ({}, {})", sx, sy);
    Some((sx, sy))
}
