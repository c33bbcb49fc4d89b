//! Stepping-stone sea routes from the mainland to each large island.
//!
//! A cursor leaves the nearest non-island land and advances towards the
//! island center in 5-8 tile steps. Each step draws an A route (curved or
//! straight) and drops a small transit island. Once the island is close,
//! or the cursor nears mainland again, a B route closes the gap: straight,
//! arc or zigzag depending on how open the sea around the island is.
//! Islands already within `transit_dist` of land get no route.

use log::debug;
use rand::Rng;

use crate::tilemap::DIR4;

use super::state::World;
use super::tile::{in_interior, Tile, TileSource, TileType};

/// Upper bound on cursor steps per island.
const MAX_ROUTE_STEPS: usize = 50;
/// Remaining distance at which a step closes the route directly.
const ARRIVAL_DIST: f64 = 5.0;
/// Chebyshev radius of the mainland-ahead check.
const MAINLAND_RADIUS: i32 = 6;
/// Radius of the land-density sample around the destination.
const SEA_WIDTH_RADIUS: i32 = 20;
/// Land share under which the sea counts as wide.
const WIDE_SEA_RATIO: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeaWidth {
    Wide,
    Narrow,
}

fn is_mainland_kind(tile: &Tile) -> bool {
    matches!(tile.kind, TileType::Soil | TileType::Cliff) && tile.source != TileSource::Island
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn to_cell(p: (f64, f64)) -> (i32, i32) {
    (p.0 as i32, p.1 as i32)
}

fn to_point(c: (i32, i32)) -> (f64, f64) {
    (c.0 as f64, c.1 as f64)
}

/// Nearest land tile that is not part of an island, first in row-major
/// order on ties.
pub fn nearest_non_island_land(world: &World, target: (i32, i32)) -> Option<(i32, i32)> {
    let mut best: Option<((i32, i32), i64)> = None;
    for (x, y, tile) in world.grid.iter() {
        if !tile.is_non_island_land() {
            continue;
        }
        let (dx, dy) = (x as i64 - target.0 as i64, y as i64 - target.1 as i64);
        let d2 = dx * dx + dy * dy;
        if best.map_or(true, |(_, b)| d2 < b) {
            best = Some(((x as i32, y as i32), d2));
        }
    }
    best.map(|(p, _)| p)
}

/// Classify the sea around a point by the share of mainland in a square.
pub fn sea_width(world: &World, center: (i32, i32)) -> SeaWidth {
    let mut land = 0usize;
    let mut checked = 0usize;
    for dy in -SEA_WIDTH_RADIUS..=SEA_WIDTH_RADIUS {
        for dx in -SEA_WIDTH_RADIUS..=SEA_WIDTH_RADIUS {
            if let Some(tile) = world.grid.get_i(center.0 + dx, center.1 + dy) {
                checked += 1;
                if is_mainland_kind(tile) {
                    land += 1;
                }
            }
        }
    }
    if checked == 0 || (land as f64 / checked as f64) < WIDE_SEA_RATIO {
        SeaWidth::Wide
    } else {
        SeaWidth::Narrow
    }
}

/// True if mainland lies within the check radius of `cell` and is closer
/// to the destination than the cursor is.
fn mainland_ahead(world: &World, cell: (i32, i32), cursor: (f64, f64), dest: (f64, f64)) -> bool {
    let cursor_dist = distance(cursor, dest);
    for dy in -MAINLAND_RADIUS..=MAINLAND_RADIUS {
        for dx in -MAINLAND_RADIUS..=MAINLAND_RADIUS {
            let (x, y) = (cell.0 + dx, cell.1 + dy);
            match world.grid.get_i(x, y) {
                Some(tile) if is_mainland_kind(tile) => {
                    if distance(to_point((x, y)), dest) < cursor_dist {
                        return true;
                    }
                }
                _ => {}
            }
        }
    }
    false
}

/// Sample points on a straight segment, two per tile of length.
pub fn line_points(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 {
        return vec![from];
    }
    let steps = (dist as usize * 2).max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            ((from.0 as f64 + dx * t) as i32, (from.1 as f64 + dy * t) as i32)
        })
        .collect()
}

/// Sample points on a quadratic Bezier curve.
pub fn bezier_points(from: (i32, i32), ctrl: (f64, f64), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (p0, p2) = (to_point(from), to_point(to));
    let steps = ((distance(p0, p2) * 2.0) as usize).max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            let x = u * u * p0.0 + 2.0 * u * t * ctrl.0 + t * t * p2.0;
            let y = u * u * p0.1 + 2.0 * u * t * ctrl.1 + t * t * p2.1;
            (x as i32, y as i32)
        })
        .collect()
}

/// Mark route water along a sampled path. Land the path starts on is
/// skipped; the first land reached after open water ends the draw. Only
/// variable-ocean tiles take the route source. Returns the tiles marked.
pub fn trace_route(world: &mut World, points: &[(i32, i32)], source: TileSource) -> usize {
    let mut in_water = false;
    let mut marked = 0;
    for &(x, y) in points {
        let Some(tile) = world.grid.get_mut_i(x, y) else {
            continue;
        };
        if tile.kind.is_land() {
            if in_water {
                break;
            }
            continue;
        }
        in_water = true;
        if tile.kind == TileType::VariableOcean && tile.source != source {
            tile.source = source;
            marked += 1;
        }
    }
    marked
}

/// Perpendicular unit vector of a segment, `None` for a zero-length one.
fn perpendicular(from: (i32, i32), to: (i32, i32)) -> Option<(f64, f64, f64)> {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 {
        return None;
    }
    Some((-dy / dist, dx / dist, dist))
}

/// A route leg: a gentle curve (offset within 5 tiles), straight under 10 tiles.
fn draw_curved_a(world: &mut World, from: (i32, i32), to: (i32, i32)) {
    let offset = world.state.rng.gen::<f64>() * 10.0 - 5.0;
    let points = match perpendicular(from, to) {
        Some((px, py, dist)) if dist >= 10.0 => {
            let mid = (((from.0 + to.0) / 2) as f64, ((from.1 + to.1) / 2) as f64);
            bezier_points(from, (mid.0 + px * offset, mid.1 + py * offset), to)
        }
        _ => line_points(from, to),
    };
    trace_route(world, &points, TileSource::TransitPathA);
}

/// B route arc bowing 5-15 tiles to a random side. Falls back to a
/// straight line when the control point sits on land.
fn draw_arc_b(world: &mut World, from: (i32, i32), to: (i32, i32)) {
    let height = 5.0 + world.state.rng.gen::<f64>() * 10.0;
    let side = if world.state.rng.gen::<f64>() < 0.5 { -1.0 } else { 1.0 };
    let Some((px, py, _)) = perpendicular(from, to) else {
        return;
    };
    let mid = (((from.0 + to.0) / 2) as f64, ((from.1 + to.1) / 2) as f64);
    let ctrl = (mid.0 + px * height * side, mid.1 + py * height * side);
    let ctrl_on_land = world
        .grid
        .get_i(ctrl.0 as i32, ctrl.1 as i32)
        .map_or(false, is_solid_ground);
    let points = if ctrl_on_land {
        line_points(from, to)
    } else {
        bezier_points(from, ctrl, to)
    };
    trace_route(world, &points, TileSource::RoutePathB);
}

fn is_solid_ground(tile: &Tile) -> bool {
    matches!(tile.kind, TileType::Soil | TileType::Cliff)
}

/// B route zigzag with a one-tile island at every turn.
fn draw_zigzag_b(world: &mut World, from: (i32, i32), to: (i32, i32)) {
    let Some((px, py, dist)) = perpendicular(from, to) else {
        return;
    };
    let segments = ((dist / 12.0) as usize).max(2);
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let mut current = from;

    for i in 1..=segments {
        let t = i as f64 / segments as f64;
        let base = (from.0 as f64 + dx * t, from.1 as f64 + dy * t);
        let mut offset = world.state.rng.gen::<f64>() * 20.0 - 10.0;
        let mut next = (base.0 + px * offset, base.1 + py * offset);
        let lands = world
            .grid
            .get_i(next.0 as i32, next.1 as i32)
            .map_or(false, is_solid_ground);
        if lands {
            offset *= 0.3;
            next = (base.0 + px * offset, base.1 + py * offset);
        }
        let cell = to_cell(next);
        let points = line_points(current, cell);
        trace_route(world, &points, TileSource::RoutePathB);

        if in_interior(&world.grid, cell.0, cell.1) {
            let (ux, uy) = (cell.0 as usize, cell.1 as usize);
            if world.grid.get(ux, uy).kind == TileType::VariableOcean {
                world.grid.set(ux, uy, Tile::new(TileType::Transit, TileSource::RouteIslandB));
                world.mark_new(ux, uy);
            }
        }
        current = cell;
    }

    let points = line_points(current, to);
    trace_route(world, &points, TileSource::RoutePathB);
}

/// Close a route with the B style picked from the sea around the island.
fn close_with_b_route(world: &mut World, from: (i32, i32), to: (i32, i32)) {
    let width = sea_width(world, to);
    let r = world.state.rng.gen::<f64>();
    match (width, r) {
        (SeaWidth::Wide, r) if r < 0.7 => draw_arc_b(world, from, to),
        (SeaWidth::Wide, _) => draw_zigzag_b(world, from, to),
        (SeaWidth::Narrow, r) if r < 0.4 => draw_zigzag_b(world, from, to),
        (SeaWidth::Narrow, _) => {
            let points = line_points(from, to);
            trace_route(world, &points, TileSource::RoutePathB);
        }
    }
    debug!("B route ({:?} sea) {:?} -> {:?}", width, from, to);
}

/// Transit island: a 4-7 tile walk confined to the 3x3 around the center,
/// plus up to three shallows next to it. Returns the transit tiles placed.
pub fn stamp_stepping_stone(world: &mut World, cx: i32, cy: i32) -> usize {
    let target = world.state.rng.gen_range(4..8);
    let (mut wx, mut wy) = (cx, cy);
    let mut placed = 0;
    let mut tries = 0;
    while placed < target && tries < 100 {
        tries += 1;
        if in_interior(&world.grid, wx, wy) {
            let (ux, uy) = (wx as usize, wy as usize);
            if world.grid.get(ux, uy).kind == TileType::VariableOcean {
                world.grid.set(ux, uy, Tile::new(TileType::Transit, TileSource::Bridge));
                world.mark_new(ux, uy);
                placed += 1;
            }
        }
        let (dx, dy) = DIR4[world.state.rng.gen_range(0..4)];
        wx = (wx + dx).clamp(cx - 1, cx + 1);
        wy = (wy + dy).clamp(cy - 1, cy + 1);
    }

    let mut shallows = 0;
    for _ in 0..20 {
        if shallows >= 3 {
            break;
        }
        let x = cx + world.state.rng.gen_range(-2..=2);
        let y = cy + world.state.rng.gen_range(-2..=2);
        if !in_interior(&world.grid, x, y) {
            continue;
        }
        let (ux, uy) = (x as usize, y as usize);
        if world.grid.get(ux, uy).kind != TileType::VariableOcean {
            continue;
        }
        let touches_transit = world
            .grid
            .neighbors_8(ux, uy)
            .any(|(nx, ny)| world.grid.get(nx, ny).kind == TileType::Transit);
        if touches_transit {
            world.grid.get_mut(ux, uy).kind = TileType::Shallow;
            world.mark_new(ux, uy);
            shallows += 1;
        }
    }
    placed
}

/// Route from the mainland to one island center. Returns false when no
/// route is drawn.
fn build_route(world: &mut World, dest_cell: (i32, i32)) -> bool {
    let Some(start) = nearest_non_island_land(world, dest_cell) else {
        debug!("no mainland to route from for island at {:?}", dest_cell);
        return false;
    };
    let dest = to_point(dest_cell);
    let mut cursor = to_point(start);
    let transit_dist = world.config.transit_dist as f64;

    if distance(cursor, dest) < transit_dist {
        debug!("island at {:?} is within reach of {:?}, no route", dest_cell, start);
        return false;
    }

    for _ in 0..MAX_ROUTE_STEPS {
        let (vx, vy) = (dest.0 - cursor.0, dest.1 - cursor.1);
        let len = (vx * vx + vy * vy).sqrt();
        if len == 0.0 {
            break;
        }
        let step = 5.0 + world.state.rng.gen_range(0..4) as f64;
        let next = (cursor.0 + vx / len * step, cursor.1 + vy / len * step);
        let cell = to_cell(next);

        if distance(to_point(cell), dest) < ARRIVAL_DIST
            || mainland_ahead(world, cell, cursor, dest)
        {
            close_with_b_route(world, to_cell(cursor), dest_cell);
            break;
        }

        if world.state.rng.gen::<f64>() < 0.5 {
            draw_curved_a(world, to_cell(cursor), cell);
        } else {
            let points = line_points(to_cell(cursor), cell);
            trace_route(world, &points, TileSource::TransitPathA);
        }
        stamp_stepping_stone(world, cell.0, cell.1);

        cursor = next;
        if distance(cursor, dest) < transit_dist {
            close_with_b_route(world, to_cell(cursor), dest_cell);
            break;
        }
    }
    true
}

/// Connect every large island to the mainland. Returns routes built.
pub fn build_transit_routes(world: &mut World) -> usize {
    let centers: Vec<(i32, i32)> = world.state.islands.iter().map(|i| i.center).collect();
    let mut built = 0;
    for center in centers {
        if build_route(world, center) {
            built += 1;
        }
    }
    built
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::world2::island::Island;
    use crate::world2::tile::{fill_variable_ocean, in_border, stamp_fixed_border};

    fn ocean_world(size: usize, seed: u64) -> World {
        let config = GeneratorConfig { width: size, height: size, ..Default::default() };
        let mut world = World::new(config, seed);
        fill_variable_ocean(&mut world.grid);
        stamp_fixed_border(&mut world.grid);
        world
    }

    fn fill(world: &mut World, x0: usize, y0: usize, x1: usize, y1: usize, source: TileSource) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                world.grid.set(x, y, Tile::new(TileType::Soil, source));
            }
        }
    }

    #[test]
    fn test_trace_skips_departure_land_and_stops_at_arrival() {
        let mut world = ocean_world(40, 1);
        fill(&mut world, 5, 10, 7, 10, TileSource::MainWalk);
        fill(&mut world, 15, 10, 17, 10, TileSource::Island);
        let points = line_points((5, 10), (20, 10));
        let marked = trace_route(&mut world, &points, TileSource::RoutePathB);
        assert_eq!(marked, 7);
        for x in 8..15 {
            assert_eq!(world.grid.get(x, 10).source, TileSource::RoutePathB);
        }
        for x in 18..=20 {
            assert_eq!(world.grid.get(x, 10).source, TileSource::None);
        }
        assert_eq!(world.grid.get(6, 10).source, TileSource::MainWalk);
    }

    #[test]
    fn test_line_points_endpoints() {
        let points = line_points((2, 3), (8, 3));
        assert_eq!(points.first(), Some(&(2, 3)));
        assert_eq!(points.last(), Some(&(8, 3)));
        assert_eq!(points.len(), 13);
    }

    #[test]
    fn test_bezier_endpoints() {
        let points = bezier_points((10, 10), (20.0, 0.0), (30, 10));
        assert_eq!(points.first(), Some(&(10, 10)));
        assert_eq!(points.last(), Some(&(30, 10)));
        assert!(points.iter().any(|&(_, y)| y < 10));
    }

    #[test]
    fn test_sea_width() {
        let mut world = ocean_world(60, 1);
        assert_eq!(sea_width(&world, (30, 30)), SeaWidth::Wide);
        fill(&mut world, 3, 3, 56, 56, TileSource::MainWalk);
        assert_eq!(sea_width(&world, (30, 30)), SeaWidth::Narrow);
        fill(&mut world, 3, 3, 56, 56, TileSource::Island);
        assert_eq!(sea_width(&world, (30, 30)), SeaWidth::Wide);
    }

    #[test]
    fn test_stepping_stone_stays_local() {
        let mut world = ocean_world(40, 4);
        let placed = stamp_stepping_stone(&mut world, 20, 20);
        assert!((1..=7).contains(&placed));
        let mut shallows = 0;
        for (x, y, tile) in world.grid.iter() {
            let (dx, dy) = (x as i32 - 20, y as i32 - 20);
            match tile.kind {
                TileType::Transit => assert!(dx.abs() <= 1 && dy.abs() <= 1),
                TileType::Shallow => {
                    assert!(dx.abs() <= 2 && dy.abs() <= 2);
                    shallows += 1;
                }
                _ => {}
            }
        }
        assert!(shallows <= 3);
    }

    #[test]
    fn test_routes_only_touch_ocean() {
        let mut world = ocean_world(100, 17);
        fill(&mut world, 8, 30, 30, 70, TileSource::MainWalk);
        fill(&mut world, 80, 45, 86, 52, TileSource::Island);
        let tiles: Vec<(usize, usize)> = (45..=52)
            .flat_map(|y| (80..=86).map(move |x| (x, y)))
            .collect();
        world.state.islands.push(Island::from_tiles(tiles).unwrap());
        let before = world.grid.clone();

        assert_eq!(build_transit_routes(&mut world), 1);

        let mut changed = 0;
        for (x, y, tile) in world.grid.iter() {
            let old = before.get(x, y);
            if old.kind.is_land() {
                assert_eq!(tile, old);
            }
            if in_border(&world.grid, x, y) {
                assert_eq!(tile.kind, TileType::FixedOcean);
            }
            if tile != old {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_island_near_land_gets_no_route() {
        let mut world = ocean_world(60, 5);
        fill(&mut world, 10, 10, 20, 20, TileSource::MainWalk);
        fill(&mut world, 27, 14, 29, 16, TileSource::Island);
        let tiles: Vec<(usize, usize)> = (14..=16)
            .flat_map(|y| (27..=29).map(move |x| (x, y)))
            .collect();
        world.state.islands.push(Island::from_tiles(tiles).unwrap());
        let before = world.grid.clone();

        assert_eq!(build_transit_routes(&mut world), 0);
        assert_eq!(world.grid, before);
        assert_eq!(world.new_tile_count(), 0);
    }

    #[test]
    fn test_no_mainland_skips_route() {
        let mut world = ocean_world(60, 3);
        fill(&mut world, 40, 40, 44, 44, TileSource::Island);
        world.state.islands.push(Island::from_tiles(vec![(40, 40), (44, 44)]).unwrap());
        assert_eq!(build_transit_routes(&mut world), 0);
    }
}
