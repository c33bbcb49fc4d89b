//! Island placement: large islands in open-ocean quadrants plus a few
//! single-tile islands anywhere on the map.

use log::debug;
use rand::Rng;

use crate::tilemap::{Tilemap, DIR4};

use super::island::Island;
use super::overlay::Rect;
use super::state::World;
use super::tile::{in_interior, Tile, TileSource, TileType, BORDER};

/// Attempts at finding a vast-ocean square per quadrant.
const VAST_OCEAN_ATTEMPTS: usize = 30;
const MAX_LARGE_ISLANDS: usize = 4;
const SMALL_ISLANDS: usize = 5;

/// Quadrant rectangle (x0, y0, x1, y1), end-exclusive, inside the border.
fn quadrant_bounds(width: usize, height: usize, quadrant: usize) -> (i32, i32, i32, i32) {
    let (w, h) = (width as i32, height as i32);
    let (hw, hh) = (w / 2, h / 2);
    match quadrant {
        0 => (BORDER, BORDER, hw, hh),
        1 => (hw, BORDER, w - BORDER, hh),
        2 => (BORDER, hh, hw, h - BORDER),
        _ => (hw, hh, w - BORDER, h - BORDER),
    }
}

/// True if the square of side `size` around `(cx, cy)` is all interior
/// variable ocean.
pub fn is_vast_ocean(world: &World, cx: i32, cy: i32, size: usize) -> bool {
    let half = (size / 2) as i32;
    for dy in -half..=half {
        for dx in -half..=half {
            let (x, y) = (cx + dx, cy + dy);
            if !in_interior(&world.grid, x, y) {
                return false;
            }
            if world.grid.get(x as usize, y as usize).kind != TileType::VariableOcean {
                return false;
            }
        }
    }
    true
}

/// Sample random centers in a quadrant until one has open water around it.
fn find_vast_ocean(world: &mut World, quadrant: usize) -> Option<(i32, i32)> {
    let (x0, y0, x1, y1) = quadrant_bounds(world.width(), world.height(), quadrant);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let size = world.config.vast_ocean_size;
    for _ in 0..VAST_OCEAN_ATTEMPTS {
        let cx = x0 + world.state.rng.gen_range(0..x1 - x0);
        let cy = y0 + world.state.rng.gen_range(0..y1 - y0);
        if is_vast_ocean(world, cx, cy, size) {
            return Some((cx, cy));
        }
    }
    None
}

/// Random walk confined to a square around the center, converting
/// ocean into island soil. Returns the converted tiles in walk order.
fn stamp_island_walk(world: &mut World, cx: i32, cy: i32) -> Vec<(usize, usize)> {
    let bound = world.config.island_bound_size;
    let half = (bound / 2) as i32;
    let ratio = 0.3 + world.state.rng.gen::<f64>() * 0.4;
    let steps = ((bound * bound) as f64 * ratio).round() as usize;

    let mut seen: Tilemap<bool> = Tilemap::new(world.width(), world.height());
    let mut tiles = Vec::new();
    let (mut wx, mut wy) = (cx, cy);
    for _ in 0..steps {
        if in_interior(&world.grid, wx, wy) {
            let (ux, uy) = (wx as usize, wy as usize);
            if world.grid.get(ux, uy).kind == TileType::VariableOcean {
                world.grid.set(ux, uy, Tile::new(TileType::Soil, TileSource::Island));
                world.mark_new(ux, uy);
            }
            if !*seen.get(ux, uy) && world.grid.get(ux, uy).source == TileSource::Island {
                seen.set(ux, uy, true);
                tiles.push((ux, uy));
            }
        }
        let (dx, dy) = DIR4[world.state.rng.gen_range(0..DIR4.len())];
        wx = (wx + dx).clamp(cx - half, cx + half);
        wy = (wy + dy).clamp(cy - half, cy + half);
    }
    tiles
}

/// Place up to four large islands, one per quadrant, visiting quadrants
/// in random order. Returns the number placed.
pub fn place_quad_islands(world: &mut World) -> usize {
    let mut quadrants = vec![0usize, 1, 2, 3];
    let size = world.config.vast_ocean_size as i32;
    let mut created = 0;

    while created < MAX_LARGE_ISLANDS && !quadrants.is_empty() {
        let idx = world.state.rng.gen_range(0..quadrants.len());
        let quadrant = quadrants.swap_remove(idx);
        let Some((cx, cy)) = find_vast_ocean(world, quadrant) else {
            debug!("quadrant {}: no vast ocean", quadrant);
            continue;
        };

        let tiles = stamp_island_walk(world, cx, cy);
        if let Some(island) = Island::from_tiles(tiles) {
            debug!(
                "quadrant {}: island of {} tiles at ({}, {})",
                quadrant,
                island.tiles.len(),
                cx,
                cy
            );
            world.overlay.rects.push(Rect {
                x: cx - size / 2,
                y: cy - size / 2,
                w: size,
                h: size,
            });
            world.state.islands.push(island);
            created += 1;
        }
    }
    created
}

/// Drop single-tile islands on random ocean cells. These are not
/// recorded as `Island`s. Returns the number placed.
pub fn place_random_islands(world: &mut World) -> usize {
    let mut placed = 0;
    for _ in 0..SMALL_ISLANDS {
        let x = world.state.rng.gen_range(0..world.width());
        let y = world.state.rng.gen_range(0..world.height());
        if in_interior(&world.grid, x as i32, y as i32)
            && world.grid.get(x, y).kind == TileType::VariableOcean
        {
            world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::Island));
            world.mark_new(x, y);
            placed += 1;
        }
    }
    placed
}
