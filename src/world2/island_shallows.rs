//! Shallows inside a ring of B-route islands.
//!
//! When zigzag routes leave enough small islands to outline a circle, the
//! water inside that circle next to those islands turns shallow, and the
//! shallows then spread once into water they half surround.

use rand::Rng;

use super::state::World;
use super::tile::{count_neighbors4, TileSource, TileType};

const MIN_ROUTE_ISLANDS: usize = 5;
const MIN_RING_RADIUS: f64 = 10.0;
const SPREAD_CHANCE: f64 = 0.7;

/// Centroid and mean distance of the B-route islands, if they form a
/// large enough ring.
pub fn route_island_ring(world: &World) -> Option<((f64, f64), f64)> {
    let points: Vec<(f64, f64)> = world
        .grid
        .iter()
        .filter(|(_, _, t)| t.source == TileSource::RouteIslandB)
        .map(|(x, y, _)| (x as f64, y as f64))
        .collect();
    if points.len() < MIN_ROUTE_ISLANDS {
        return None;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
    let radius = points
        .iter()
        .map(|p| ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    (radius >= MIN_RING_RADIUS).then_some(((cx, cy), radius))
}

/// Returns the number of shallows placed, or `None` when no ring exists.
pub fn adjust_island_shallows(world: &mut World) -> Option<usize> {
    let ((cx, cy), radius) = route_island_ring(world)?;
    let inside = |x: usize, y: usize| ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt() < radius;

    let first: Vec<(usize, usize)> = world
        .grid
        .iter()
        .filter(|&(x, y, t)| t.kind == TileType::VariableOcean && inside(x, y))
        .filter(|&(x, y, _)| {
            count_neighbors4(&world.grid, x, y, |n| {
                n.kind.is_land() && n.source == TileSource::RouteIslandB
            }) > 0
        })
        .map(|(x, y, _)| (x, y))
        .collect();
    if first.is_empty() {
        return Some(0);
    }
    for &(x, y) in &first {
        world.grid.get_mut(x, y).kind = TileType::Shallow;
        world.mark_new(x, y);
    }

    let spread: Vec<(usize, usize)> = world
        .grid
        .iter()
        .filter(|&(x, y, t)| t.kind == TileType::VariableOcean && inside(x, y))
        .filter(|&(x, y, _)| count_neighbors4(&world.grid, x, y, |n| n.kind == TileType::Shallow) >= 2)
        .map(|(x, y, _)| (x, y))
        .collect();
    let mut placed = first.len();
    for (x, y) in spread {
        if world.state.rng.gen::<f64>() < SPREAD_CHANCE {
            world.grid.get_mut(x, y).kind = TileType::Shallow;
            world.mark_new(x, y);
            placed += 1;
        }
    }
    Some(placed)
}
