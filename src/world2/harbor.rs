//! Harbor search: an island-side port facing away from the deep sea, and
//! three mainland candidate points found by a spiral scan.
//!
//! Candidates model a C-shaped bay: B is the first mainland soil the
//! spiral reaches, C the first open water after it (the bay mouth), A the
//! next mainland soil after that.

use std::f64::consts::PI;

use log::{debug, warn};

use super::island::{HarborSites, Island};
use super::overlay::{WorkMap, WorkMark};
use super::state::World;
use super::tile::TileType;

/// Half side of the square searched for deep sea around an island.
const DEEP_SEA_SEARCH: i32 = 50;
/// Distance between successive spiral arms, in tiles.
const SPIRAL_PITCH: f64 = 1.0;
/// Arc length between spiral samples, in tiles.
const SPIRAL_STEP: f64 = 0.5;
/// Hard cap on spiral samples.
const MAX_SPIRAL_STEPS: usize = 8_000_000;

/// Port on the island's bounding circle, opposite the nearest deep sea.
/// Without deep sea nearby the port sits on the north edge of the box.
pub fn find_island_port(world: &World, island: &Island) -> (i32, i32) {
    let (cx, cy) = island.center;
    let (min_x, min_y, max_x, max_y) = island.bounds;
    let half_w = ((max_x - min_x) / 2) as i32;
    let half_h = ((max_y - min_y) / 2) as i32;

    let mut nearest: Option<((i32, i32), i32)> = None;
    for dx in -DEEP_SEA_SEARCH..=DEEP_SEA_SEARCH {
        for dy in -DEEP_SEA_SEARCH..=DEEP_SEA_SEARCH {
            let Some(tile) = world.grid.get_i(cx + dx, cy + dy) else {
                continue;
            };
            if !matches!(tile.kind, TileType::DeepSea | TileType::VeryDeepSea) {
                continue;
            }
            let d2 = dx * dx + dy * dy;
            if nearest.map_or(true, |(_, best)| d2 < best) {
                nearest = Some(((cx + dx, cy + dy), d2));
            }
        }
    }

    let Some(((sx, sy), _)) = nearest else {
        return (cx, cy - half_h);
    };
    let (dx, dy) = ((cx - sx) as f64, (cy - sy) as f64);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return (cx, cy);
    }
    let radius = ((half_w * half_w + half_h * half_h) as f64).sqrt();
    let px = cx + (dx / length * radius) as i32;
    let py = cy + (dy / length * radius) as i32;
    (
        px.clamp(0, world.width() as i32 - 1),
        py.clamp(0, world.height() as i32 - 1),
    )
}

/// Archimedean spiral (r = b * theta) starting due north and turning
/// clockwise. Every in-bounds sample is recorded in `work`. Returns the
/// candidate sites found, with `port` left unset.
pub fn spiral_search(world: &World, start: (i32, i32), work: &mut WorkMap) -> HarborSites {
    let (w, h) = (world.width() as f64, world.height() as f64);
    let b = SPIRAL_PITCH / (2.0 * PI);
    let max_theta = (w * w + h * h).sqrt() / b;
    let mut theta = 0.0;
    let mut sites = HarborSites::default();

    for _ in 0..MAX_SPIRAL_STEPS {
        if theta > max_theta {
            return sites;
        }
        let r = b * theta;
        let angle = theta - PI / 2.0;
        let x = start.0 + (r * angle.cos()) as i32;
        let y = start.1 + (r * angle.sin()) as i32;

        if let Some(tile) = world.grid.get_i(x, y) {
            if let Some(mark) = work.get_mut_i(x, y) {
                if *mark == WorkMark::None {
                    *mark = WorkMark::Spiral;
                }
            }
            let mainland = tile.is_mainland_soil();
            let open_water = matches!(tile.kind, TileType::VariableOcean | TileType::Shallow);
            if sites.candidate_b.is_none() {
                if mainland {
                    sites.candidate_b = Some((x, y));
                }
            } else if sites.candidate_c.is_none() {
                if open_water {
                    sites.candidate_c = Some((x, y));
                }
            } else if mainland {
                sites.candidate_a = Some((x, y));
                return sites;
            }
        }

        theta += if r < 1.0 { SPIRAL_STEP } else { SPIRAL_STEP / r };
    }
    warn!("harbor spiral from {:?} hit the step cap", start);
    sites
}

/// Run the port and candidate search for every island, writing the
/// results into the island records and the work map. Returns how many
/// islands got all three candidates.
pub fn search_harbors(world: &mut World) -> usize {
    let mut work = world
        .state
        .work
        .take()
        .unwrap_or_else(|| WorkMap::new(world.width(), world.height()));
    let mut complete = 0;

    for idx in 0..world.state.islands.len() {
        let island = &world.state.islands[idx];
        let port = find_island_port(world, island);
        let mut sites = spiral_search(world, port, &mut work);
        sites.port = Some(port);

        for (x, y) in [sites.candidate_b, sites.candidate_c, sites.candidate_a]
            .into_iter()
            .flatten()
        {
            if let Some(mark) = work.get_mut_i(x, y) {
                *mark = WorkMark::Candidate;
            }
        }
        if let Some(mark) = work.get_mut_i(port.0, port.1) {
            *mark = WorkMark::Port;
        }

        let found = sites.candidate_a.is_some() && sites.candidate_b.is_some() && sites.candidate_c.is_some();
        if found {
            complete += 1;
        }
        debug!(
            "island {} port {:?}: B {:?} C {:?} A {:?}",
            idx, port, sites.candidate_b, sites.candidate_c, sites.candidate_a
        );
        world.state.islands[idx].harbor = sites;
    }

    world.state.work = Some(work);
    complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::world2::tile::{fill_variable_ocean, stamp_fixed_border, Tile, TileSource};

    fn split_world() -> World {
        let config = GeneratorConfig { width: 80, height: 80, ..Default::default() };
        let mut world = World::new(config, 2);
        fill_variable_ocean(&mut world.grid);
        stamp_fixed_border(&mut world.grid);
        for y in 3..77 {
            for x in 3..20 {
                world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::MainWalk));
            }
        }
        let mut tiles = Vec::new();
        for y in 38..=42 {
            for x in 58..=62 {
                world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::Island));
                tiles.push((x, y));
            }
        }
        world.state.islands.push(Island::from_tiles(tiles).unwrap());
        world
    }

    #[test]
    fn test_port_without_deep_sea_faces_north() {
        let world = split_world();
        let island = &world.state.islands[0];
        assert_eq!(find_island_port(&world, island), (60, 38));
    }

    #[test]
    fn test_port_faces_away_from_deep_sea() {
        let mut world = split_world();
        world.grid.get_mut(60, 50).kind = TileType::DeepSea;
        let island = world.state.islands[0].clone();
        let (px, py) = find_island_port(&world, &island);
        assert_eq!(px, 60);
        assert!(py < 40);
    }

    #[test]
    fn test_spiral_finds_bay_candidates_in_order() {
        let mut world = split_world();
        world.state.work = Some(WorkMap::new(80, 80));
        assert_eq!(search_harbors(&mut world), 1);
        let sites = &world.state.islands[0].harbor;
        let b = sites.candidate_b.unwrap();
        let c = sites.candidate_c.unwrap();
        let a = sites.candidate_a.unwrap();
        assert!(world.grid.get(b.0 as usize, b.1 as usize).is_mainland_soil());
        assert!(world.grid.get(a.0 as usize, a.1 as usize).is_mainland_soil());
        assert_eq!(world.grid.get(c.0 as usize, c.1 as usize).kind, TileType::VariableOcean);
        assert_eq!(sites.port, Some((60, 38)));
        let work = world.state.work.as_ref().unwrap();
        assert_eq!(*work.get(b.0 as usize, b.1 as usize), WorkMark::Candidate);
        assert_eq!(*work.get(60, 38), WorkMark::Port);
    }

    #[test]
    fn test_spiral_without_mainland_is_soft_failure() {
        let config = GeneratorConfig { width: 30, height: 30, ..Default::default() };
        let mut world = World::new(config, 2);
        fill_variable_ocean(&mut world.grid);
        let mut work = WorkMap::new(30, 30);
        let sites = spiral_search(&world, (15, 15), &mut work);
        assert_eq!(sites, HarborSites::default());
        assert!(work.iter().any(|(_, _, m)| *m == WorkMark::Spiral));
    }
}
