//! Coastal carver: turns short coastline paths into cliffs or shallows.
//!
//! Each accepted path lowers the cliff multiplier, so the loop winds down
//! as the coast gets processed. Streak counters force the opposite outcome
//! after `force_switch` identical decisions in a row.

use std::collections::VecDeque;

use log::{debug, warn};
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::tilemap::Tilemap;

use super::state::{GeneratorState, World};
use super::tile::{is_coastal, Grid, TileType};

pub const MAX_CARVER_ITERATIONS: usize = 10_000;
/// The loop runs while the multiplier stays above this.
const MULTIPLIER_EPSILON: f64 = 1e-9;
/// Largest Chebyshev distance between endpoints A and B.
const MAX_ENDPOINT_DIST: i32 = 5;
/// Multiplier decrement when A has no partner in range.
const NO_PARTNER_DEC: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarverReport {
    pub iterations: usize,
    pub cliffs: usize,
    pub shallows: usize,
    pub rejected: usize,
}

impl CarverReport {
    pub fn accepted(&self) -> usize {
        self.cliffs + self.shallows
    }
}

/// Reset carver state for a new run.
pub fn init_carver(state: &mut GeneratorState, config: &GeneratorConfig) {
    state.multiplier = config.cliff_init;
    state.cliff_streak = 0;
    state.shallow_streak = 0;
    state.excluded.fill(false);
}

/// Shortest 4-connected path over land from `a` to `b`, at most
/// `max_len` tiles long, endpoints included.
///
/// The search is confined to the window a path of that length can reach,
/// so its cost does not grow with the map. Still the hot spot of the
/// carver on large maps.
pub fn find_land_path(
    grid: &Grid,
    a: (usize, usize),
    b: (usize, usize),
    max_len: usize,
) -> Option<Vec<(usize, usize)>> {
    if max_len == 0 {
        return None;
    }
    let reach = max_len as i32;
    let side = (2 * reach + 1) as usize;
    let origin = (a.0 as i32 - reach, a.1 as i32 - reach);
    let local = |x: usize, y: usize| -> Option<(usize, usize)> {
        let (lx, ly) = (x as i32 - origin.0, y as i32 - origin.1);
        (lx >= 0 && ly >= 0 && (lx as usize) < side && (ly as usize) < side)
            .then_some((lx as usize, ly as usize))
    };

    let mut parent: Tilemap<Option<(usize, usize)>> = Tilemap::new(side, side);
    let mut depth: Tilemap<usize> = Tilemap::new_with(side, side, usize::MAX);
    let (ax, ay) = local(a.0, a.1)?;
    depth.set(ax, ay, 1);
    let mut queue = VecDeque::from([a]);

    while let Some((x, y)) = queue.pop_front() {
        let (lx, ly) = local(x, y)?;
        let d = *depth.get(lx, ly);
        if (x, y) == b {
            let mut path = vec![b];
            let mut cursor = *parent.get(lx, ly);
            while let Some(p) = cursor {
                path.push(p);
                let (px, py) = local(p.0, p.1)?;
                cursor = *parent.get(px, py);
            }
            path.reverse();
            return Some(path);
        }
        if d >= max_len {
            continue;
        }
        for (nx, ny) in grid.neighbors(x, y) {
            let Some((nlx, nly)) = local(nx, ny) else {
                continue;
            };
            if *depth.get(nlx, nly) != usize::MAX || !grid.get(nx, ny).kind.is_land() {
                continue;
            }
            depth.set(nlx, nly, d + 1);
            parent.set(nlx, nly, Some((x, y)));
            queue.push_back((nx, ny));
        }
    }
    None
}

/// Turn every variable-ocean tile around `path` into shallow water, then
/// promote variable ocean that touches at least three of those new
/// shallows. Only variable ocean is ever converted. Returns tiles changed.
pub fn apply_shallow(world: &mut World, path: &[(usize, usize)]) -> usize {
    let mut ring: Vec<(usize, usize)> = Vec::new();
    for &(x, y) in path {
        for (nx, ny) in world.grid.neighbors_8(x, y) {
            if world.grid.get(nx, ny).kind == TileType::VariableOcean && !ring.contains(&(nx, ny)) {
                ring.push((nx, ny));
            }
        }
    }
    for &(x, y) in &ring {
        world.grid.get_mut(x, y).kind = TileType::Shallow;
        world.mark_new(x, y);
    }

    let mut promoted: Vec<(usize, usize)> = Vec::new();
    for &(x, y) in &ring {
        for (nx, ny) in world.grid.neighbors_8(x, y) {
            if world.grid.get(nx, ny).kind != TileType::VariableOcean || promoted.contains(&(nx, ny)) {
                continue;
            }
            let touching = world
                .grid
                .neighbors_8(nx, ny)
                .filter(|p| ring.contains(p))
                .count();
            if touching >= 3 {
                promoted.push((nx, ny));
            }
        }
    }
    for &(x, y) in &promoted {
        world.grid.get_mut(x, y).kind = TileType::Shallow;
        world.mark_new(x, y);
    }
    ring.len() + promoted.len()
}

fn exclude(world: &mut World, p: (usize, usize)) {
    world.state.excluded.set(p.0, p.1, true);
}

/// Random non-excluded coastal tile within a random distance of `a`.
fn pick_partner(world: &mut World, a: (usize, usize)) -> Option<(usize, usize)> {
    let dist = world.state.rng.gen_range(1..=MAX_ENDPOINT_DIST);
    let mut candidates = Vec::new();
    for dy in -dist..=dist {
        for dx in -dist..=dist {
            let (x, y) = (a.0 as i32 + dx, a.1 as i32 + dy);
            if (dx, dy) == (0, 0) || !world.grid.contains(x, y) {
                continue;
            }
            let (ux, uy) = (x as usize, y as usize);
            if !*world.state.excluded.get(ux, uy) && is_coastal(&world.grid, ux, uy) {
                candidates.push((ux, uy));
            }
        }
    }
    if candidates.is_empty() {
        return None;
    }
    let idx = world.state.rng.gen_range(0..candidates.len());
    Some(candidates[idx])
}

/// Decide the outcome for a path of `len` tiles. Forced switches do not
/// draw from the RNG.
fn decide_cliff(world: &mut World, len: usize) -> bool {
    let force = world.config.force_switch;
    if force > 0 {
        if world.state.cliff_streak >= force {
            return false;
        }
        if world.state.shallow_streak >= force {
            return true;
        }
    }
    let prob = len as f64 * world.state.multiplier;
    world.state.rng.gen::<f64>() * 100.0 < prob
}

/// Carver loop state between iterations.
pub struct Carver {
    candidates: Vec<(usize, usize)>,
    max_len: usize,
    pub report: CarverReport,
}

impl Carver {
    /// Collect the coastal tiles once; later iterations only filter them,
    /// since carving never creates new coast.
    pub fn new(world: &World) -> Self {
        let candidates = world
            .grid
            .iter()
            .filter(|&(x, y, _)| is_coastal(&world.grid, x, y))
            .map(|(x, y, _)| (x, y))
            .collect();
        Self {
            candidates,
            max_len: world.config.max_cliff_path_len(),
            report: CarverReport::default(),
        }
    }

    pub fn is_done(&self, world: &World) -> bool {
        world.state.multiplier <= MULTIPLIER_EPSILON || self.report.iterations >= MAX_CARVER_ITERATIONS
    }

    /// One iteration. Returns false once no candidate is left.
    pub fn step(&mut self, world: &mut World) -> bool {
        self.report.iterations += 1;

        self.candidates
            .retain(|&(x, y)| !*world.state.excluded.get(x, y) && is_coastal(&world.grid, x, y));
        if self.candidates.is_empty() {
            return false;
        }
        let a = self.candidates[world.state.rng.gen_range(0..self.candidates.len())];

        // A stays eligible; an isolated coast only drains the multiplier.
        let Some(b) = pick_partner(world, a) else {
            world.state.multiplier -= NO_PARTNER_DEC;
            self.report.rejected += 1;
            return true;
        };

        let Some(path) = find_land_path(&world.grid, a, b, self.max_len) else {
            exclude(world, a);
            exclude(world, b);
            self.report.rejected += 1;
            return true;
        };

        if decide_cliff(world, path.len()) {
            for &(x, y) in &path {
                world.grid.get_mut(x, y).kind = TileType::Cliff;
                world.mark_new(x, y);
            }
            world.state.multiplier -= world.config.cliff_dec;
            world.state.cliff_streak += 1;
            world.state.shallow_streak = 0;
            self.report.cliffs += 1;
        } else {
            apply_shallow(world, &path);
            world.state.multiplier -= world.config.shallow_dec;
            world.state.shallow_streak += 1;
            world.state.cliff_streak = 0;
            self.report.shallows += 1;
        }
        for &p in &path {
            exclude(world, p);
        }
        true
    }
}

/// Run the carver until the multiplier is spent, candidates run out, or
/// the iteration cap is reached.
pub fn carve_coast(world: &mut World) -> CarverReport {
    let mut carver = Carver::new(world);
    while !carver.is_done(world) {
        if !carver.step(world) {
            break;
        }
    }

    let report = carver.report;
    if report.iterations >= MAX_CARVER_ITERATIONS {
        warn!("coastal carver hit the iteration cap");
    }
    debug!(
        "carver: {} iterations, {} cliffs, {} shallows, {} rejected, multiplier {:.2}",
        report.iterations, report.cliffs, report.shallows, report.rejected, world.state.multiplier
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world2::tile::{fill_variable_ocean, stamp_fixed_border, Tile, TileSource};

    fn world_with(size: usize, seed: u64, config: GeneratorConfig) -> World {
        let config = GeneratorConfig { width: size, height: size, ..config };
        let mut world = World::new(config, seed);
        fill_variable_ocean(&mut world.grid);
        stamp_fixed_border(&mut world.grid);
        init_carver(&mut world.state, &world.config);
        world
    }

    fn soil(world: &mut World, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::MainWalk));
            }
        }
    }

    #[test]
    fn test_path_is_shortest_over_land() {
        let mut world = world_with(30, 1, GeneratorConfig::default());
        soil(&mut world, 10, 10, 14, 10);
        let path = find_land_path(&world.grid, (10, 10), (14, 10), 5).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&(10, 10)));
        assert_eq!(path.last(), Some(&(14, 10)));
        assert!(find_land_path(&world.grid, (10, 10), (14, 10), 4).is_none());
    }

    #[test]
    fn test_path_does_not_cross_water() {
        let mut world = world_with(30, 1, GeneratorConfig::default());
        soil(&mut world, 10, 10, 11, 10);
        soil(&mut world, 13, 10, 14, 10);
        assert!(find_land_path(&world.grid, (10, 10), (13, 10), 10).is_none());
    }

    #[test]
    fn test_shallow_ring_and_promotion() {
        let mut world = world_with(30, 1, GeneratorConfig::default());
        soil(&mut world, 10, 10, 12, 10);
        let path = vec![(10, 10), (11, 10), (12, 10)];
        let changed = apply_shallow(&mut world, &path);
        assert!(changed >= 12);
        assert_eq!(world.grid.get(9, 9).kind, TileType::Shallow);
        assert_eq!(world.grid.get(13, 11).kind, TileType::Shallow);
        // three ring neighbors: promoted
        assert_eq!(world.grid.get(11, 8).kind, TileType::Shallow);
        assert_eq!(world.grid.get(8, 10).kind, TileType::Shallow);
        // one ring neighbor: not promoted
        assert_eq!(world.grid.get(8, 8).kind, TileType::VariableOcean);
        // only one extra ring
        assert_eq!(world.grid.get(11, 7).kind, TileType::VariableOcean);
        assert_eq!(world.grid.get(11, 10).kind, TileType::Soil);
    }

    #[test]
    fn test_shallow_never_touches_fixed_border() {
        let mut world = world_with(30, 1, GeneratorConfig::default());
        soil(&mut world, 3, 10, 3, 12);
        apply_shallow(&mut world, &[(3, 10), (3, 11), (3, 12)]);
        for y in 0..30 {
            for x in 0..3 {
                assert_eq!(world.grid.get(x, y).kind, TileType::FixedOcean);
            }
        }
        assert_eq!(world.grid.get(4, 11).kind, TileType::Shallow);
    }

    #[test]
    fn test_shallow_at_map_edge_is_bounds_safe() {
        let config = GeneratorConfig { width: 20, height: 20, ..Default::default() };
        let mut world = World::new(config, 1);
        fill_variable_ocean(&mut world.grid);
        world.grid.set(0, 0, Tile::new(TileType::Soil, TileSource::MainWalk));
        let changed = apply_shallow(&mut world, &[(0, 0)]);
        // The corner ring has three tiles and nothing outside it touches three of them.
        assert_eq!(changed, 3);
        assert_eq!(world.grid.get(1, 1).kind, TileType::Shallow);
        assert_eq!(world.grid.get(2, 1).kind, TileType::VariableOcean);
    }

    #[test]
    fn test_carver_terminates_within_hundred_accepts() {
        let config = GeneratorConfig { cliff_init: 10.0, cliff_dec: 0.1, shallow_dec: 0.1, ..Default::default() };
        let mut world = world_with(120, 4, config);
        soil(&mut world, 10, 10, 109, 109);
        for k in 0..40 {
            // notch the coast so there is plenty of it
            let x = 12 + k * 2;
            world.grid.set(x, 10, Tile::new(TileType::VariableOcean, TileSource::None));
            world.grid.set(x, 109, Tile::new(TileType::VariableOcean, TileSource::None));
        }
        let report = carve_coast(&mut world);
        assert!(report.accepted() <= 100);
        assert!(report.iterations <= MAX_CARVER_ITERATIONS);
        if report.accepted() == 100 {
            assert!(world.state.multiplier <= MULTIPLIER_EPSILON);
        }
    }

    #[test]
    fn test_streaks_never_overlap_or_exceed_switch() {
        let config = GeneratorConfig { cliff_init: 10.0, force_switch: 2, ..Default::default() };
        let mut world = world_with(80, 9, config);
        soil(&mut world, 10, 10, 69, 69);
        let mut carver = Carver::new(&world);
        while !carver.is_done(&world) && carver.step(&mut world) {
            let (c, s) = (world.state.cliff_streak, world.state.shallow_streak);
            assert!(c == 0 || s == 0);
            assert!(c <= 2 && s <= 2);
        }
        assert!(carver.report.accepted() > 0);
    }

    #[test]
    fn test_isolated_coast_drains_multiplier() {
        let config = GeneratorConfig { cliff_init: 1.0, ..Default::default() };
        let mut world = world_with(40, 6, config);
        for &(x, y) in &[(8, 8), (20, 20), (31, 31)] {
            world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::Island));
        }
        let report = carve_coast(&mut world);
        assert_eq!(report.accepted(), 0);
        assert_eq!(report.rejected, report.iterations);
        assert!(report.iterations >= 10 && report.iterations <= 11);
        assert!(world.state.multiplier <= MULTIPLIER_EPSILON);
        assert!(world.state.excluded.iter().all(|(_, _, e)| !*e));
        assert_eq!(world.grid.get(20, 20).kind, TileType::Soil);
    }

    #[test]
    fn test_cliff_outcome_marks_path() {
        let config = GeneratorConfig { cliff_init: 1000.0, cliff_dec: 1000.0, ..Default::default() };
        let mut world = world_with(40, 2, config);
        soil(&mut world, 15, 15, 24, 24);
        let report = carve_coast(&mut world);
        assert_eq!(report.cliffs, 1);
        assert_eq!(world.state.cliff_streak, 1);
        assert_eq!(world.state.shallow_streak, 0);
        let cliffs = world.grid.iter().filter(|(_, _, t)| t.kind == TileType::Cliff).count();
        assert!(cliffs >= 2 && cliffs <= 5);
        assert_eq!(world.new_tile_count(), cliffs);
    }
}
