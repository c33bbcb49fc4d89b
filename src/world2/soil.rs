//! Random-walk land growth and the tectonic shift.
//!
//! Growth runs in milestones of 10% of the soil target. Walkers convert
//! the cell they stand on, then step towards the best-scoring neighbor
//! (mask value plus noise). The shift translates everything grown so far
//! once, so the second half of the growth starts from a displaced core.

use log::{debug, warn};
use rand::Rng;

use crate::tilemap::DIR4;

use super::state::World;
use super::tile::{count_kind, in_interior, Tile, TileSource, TileType, BORDER};

/// Walkers spawned when growth starts.
pub const WALKER_COUNT: usize = 10;
/// Ticks allowed per milestone before growth gives up.
pub const MAX_TICKS_PER_MILESTONE: usize = 500_000;
/// A walker whose best direction scores below this respawns.
const RESPAWN_SCORE: f64 = 0.1;
/// Noise added to each direction's mask value.
const SCORE_NOISE: f64 = 0.5;
/// Magnitude by which a colliding shift is pulled back per axis.
const SHIFT_CORRECTION: i32 = 5;

/// Soil count a milestone (1..=10) must reach.
pub fn milestone_target(target_soil_count: usize, milestone: u32) -> usize {
    (target_soil_count as f64 * milestone as f64 / 10.0).round() as usize
}

/// Spawn point near the map center. The first milestone keeps walkers
/// within 5 tiles; later ones spread to 10.
fn spawn_point(world: &mut World, milestone: u32) -> (i32, i32) {
    let cx = (world.width() / 2) as i32;
    let cy = (world.height() / 2) as i32;
    let jitter = if milestone <= 1 { 5 } else { 10 };
    let rng = &mut world.state.rng;
    (cx + rng.gen_range(-jitter..jitter), cy + rng.gen_range(-jitter..jitter))
}

/// Grow soil until the milestone target is met or the tick cap is hit.
/// Returns the number of tiles converted.
pub fn grow_soil(world: &mut World, milestone: u32) -> usize {
    let target = milestone_target(world.state.target_soil_count, milestone);
    let source = if world.state.shifted() {
        TileSource::SecondaryWalk
    } else {
        TileSource::MainWalk
    };

    if world.state.walkers.is_empty() {
        for _ in 0..WALKER_COUNT {
            let (x, y) = spawn_point(world, milestone);
            world.state.walkers.push(x, y);
        }
    }

    let start = world.state.current_soil_count;
    let mut ticks = 0;
    while world.state.current_soil_count < target && ticks < MAX_TICKS_PER_MILESTONE {
        ticks += 1;
        for i in 0..world.state.walkers.len() {
            let (wx, wy) = world.state.walkers.position(i);

            if in_interior(&world.grid, wx, wy) {
                let (ux, uy) = (wx as usize, wy as usize);
                if world.grid.get(ux, uy).kind == TileType::VariableOcean {
                    world.grid.set(ux, uy, Tile::new(TileType::Soil, source));
                    world.mark_new(ux, uy);
                    world.state.current_soil_count += 1;
                }
            }

            let state = &mut world.state;
            let mut best_dir = state.rng.gen_range(0..DIR4.len());
            let mut best_score = -1.0;
            for (d, &(dx, dy)) in DIR4.iter().enumerate() {
                let base = match &state.mask {
                    Some(mask) => mask.get_i(wx + dx, wy + dy).copied().unwrap_or(0.0),
                    None => 1.0,
                };
                let score = base + state.rng.gen::<f64>() * SCORE_NOISE;
                if score > best_score {
                    best_score = score;
                    best_dir = d;
                }
            }

            if best_score < RESPAWN_SCORE || !in_interior(&world.grid, wx, wy) {
                let (sx, sy) = spawn_point(world, milestone);
                world.state.walkers.set(i, sx, sy);
            } else {
                let (dx, dy) = DIR4[best_dir];
                world.state.walkers.set(i, wx + dx, wy + dy);
            }
        }
    }

    if ticks >= MAX_TICKS_PER_MILESTONE {
        warn!(
            "soil growth hit the tick cap at milestone {} ({}/{})",
            milestone, world.state.current_soil_count, target
        );
    }
    let grown = world.state.current_soil_count - start;
    debug!(
        "milestone {}: +{} soil, {}/{} (ticks {})",
        milestone, grown, world.state.current_soil_count, target, ticks
    );
    grown
}

/// Translate all soil by a random offset, pulling the offset back towards
/// zero on any axis where it would push soil into the border. Soil that
/// still lands outside the interior is dropped. Returns the applied offset.
pub fn tectonic_shift(world: &mut World) -> (i32, i32) {
    let w = world.width() as i32;
    let h = world.height() as i32;
    let rng = &mut world.state.rng;
    let mut shift_x = rng.gen_range(0..w / 3 * 2) - w / 3;
    let mut shift_y = rng.gen_range(0..h / 3 * 2) - h / 3;

    let soil: Vec<(usize, usize, Tile)> = world
        .grid
        .iter()
        .filter(|(_, _, t)| t.kind == TileType::Soil)
        .map(|(x, y, t)| (x, y, *t))
        .collect();

    let inside = |v: i32, size: i32| v >= BORDER && v < size - BORDER;
    if soil.iter().any(|&(x, _, _)| !inside(x as i32 + shift_x, w)) {
        shift_x += if shift_x > 0 { -SHIFT_CORRECTION } else { SHIFT_CORRECTION };
    }
    if soil.iter().any(|&(_, y, _)| !inside(y as i32 + shift_y, h)) {
        shift_y += if shift_y > 0 { -SHIFT_CORRECTION } else { SHIFT_CORRECTION };
    }

    for &(x, y, _) in &soil {
        world.grid.set(x, y, Tile::new(TileType::VariableOcean, TileSource::None));
    }
    for &(x, y, tile) in &soil {
        let nx = x as i32 + shift_x;
        let ny = y as i32 + shift_y;
        if in_interior(&world.grid, nx, ny) {
            world.grid.set(nx as usize, ny as usize, tile);
            world.mark_new(nx as usize, ny as usize);
        }
    }

    world.state.walkers.translate_clamped(
        shift_x,
        shift_y,
        (BORDER, BORDER),
        (w - BORDER - 1, h - BORDER - 1),
    );

    let before = world.state.current_soil_count;
    world.state.current_soil_count = count_kind(&world.grid, TileType::Soil);
    world.state.tectonic_offset = Some((shift_x, shift_y));
    debug!(
        "tectonic shift ({}, {}): soil {} -> {}",
        shift_x, shift_y, before, world.state.current_soil_count
    );
    (shift_x, shift_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, MaskShape};
    use crate::world2::mask::{draw_soil_target, generate_mask};
    use crate::world2::tile::{fill_variable_ocean, stamp_fixed_border};

    fn seeded_world(size: usize, seed: u64) -> World {
        let config = GeneratorConfig { width: size, height: size, ..Default::default() };
        let mut world = World::new(config, seed);
        fill_variable_ocean(&mut world.grid);
        stamp_fixed_border(&mut world.grid);
        let mask = generate_mask(MaskShape::Full, size, size, &mut world.state.rng);
        world.state.mask = Some(mask);
        let (pct, count) = draw_soil_target(&world.config, &mut world.state.rng);
        world.state.target_percent = pct;
        world.state.target_soil_count = count;
        world
    }

    #[test]
    fn test_milestone_targets() {
        assert_eq!(milestone_target(400, 1), 40);
        assert_eq!(milestone_target(405, 3), 122);
        assert_eq!(milestone_target(405, 10), 405);
    }

    #[test]
    fn test_growth_is_monotonic_and_tracks_new_tiles() {
        let mut world = seeded_world(60, 7);
        let mut last = 0;
        for milestone in 1..=10 {
            world.state.new_tiles.fill(false);
            let grown = grow_soil(&mut world, milestone);
            let now = world.state.current_soil_count;
            assert!(now >= last);
            assert_eq!(now - last, grown);
            assert_eq!(world.new_tile_count(), grown);
            assert_eq!(count_kind(&world.grid, TileType::Soil), now);
            last = now;
        }
        assert!(last >= world.state.target_soil_count);
    }

    #[test]
    fn test_growth_stays_out_of_border() {
        let mut world = seeded_world(40, 11);
        for milestone in 1..=10 {
            grow_soil(&mut world, milestone);
        }
        for (x, y, tile) in world.grid.iter() {
            if in_interior(&world.grid, x as i32, y as i32) {
                continue;
            }
            assert_eq!(tile.kind, TileType::FixedOcean);
        }
    }

    #[test]
    fn test_tectonic_shift_keeps_soil_inside_and_recounts() {
        let mut world = seeded_world(60, 3);
        for milestone in 1..=3 {
            grow_soil(&mut world, milestone);
        }
        let (dx, dy) = tectonic_shift(&mut world);
        assert_eq!(world.state.tectonic_offset, Some((dx, dy)));
        assert_eq!(world.state.current_soil_count, count_kind(&world.grid, TileType::Soil));
        for (x, y, tile) in world.grid.iter() {
            if tile.kind == TileType::Soil {
                assert!(in_interior(&world.grid, x as i32, y as i32));
            }
        }
        for i in 0..world.state.walkers.len() {
            let (wx, wy) = world.state.walkers.position(i);
            assert!(in_interior(&world.grid, wx, wy));
        }
    }

    #[test]
    fn test_growth_after_shift_is_secondary() {
        let mut world = seeded_world(60, 5);
        for milestone in 1..=3 {
            grow_soil(&mut world, milestone);
        }
        tectonic_shift(&mut world);
        world.state.new_tiles.fill(false);
        grow_soil(&mut world, 4);
        for (x, y, &new) in world.state.new_tiles.iter() {
            if new {
                assert_eq!(world.grid.get(x, y).source, TileSource::SecondaryWalk);
            }
        }
    }
}
