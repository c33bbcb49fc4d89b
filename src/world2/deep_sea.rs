//! Deep-sea ellipses between each large island and the mainland.

use log::debug;
use rand::Rng;

use super::overlay::MarkerKind;
use super::state::World;
use super::tile::{TileSource, TileType};

/// Width of the deep-sea belt used to size the ellipse's major axis.
const BELT_WIDTH: i32 = 10;
/// Normalized squared radius of the very-deep core.
const VERY_DEEP_CORE: f64 = 0.25;

/// Angle ranges in degrees, screen coordinates (y grows southwards), in
/// scan order: north, east, south, west. Within a quadrant angles are
/// visited in ascending order, so east starts at 0°.
const QUADRANTS: [&[(u32, u32)]; 4] = [
    &[(225, 315)],
    &[(0, 45), (315, 360)],
    &[(45, 135)],
    &[(135, 225)],
];

/// Cast rays from `center` quadrant by quadrant with a growing radius and
/// return the first mainland soil tile hit.
pub fn find_belt_anchor(world: &World, center: (i32, i32)) -> Option<(i32, i32)> {
    let (w, h) = (world.width() as f64, world.height() as f64);
    let max_radius = (w * w + h * h).sqrt() as i32;
    for ranges in QUADRANTS {
        for radius in 1..=max_radius {
            for deg in ranges.iter().flat_map(|&(from, to)| from..to) {
                let rad = deg as f64 * std::f64::consts::PI / 180.0;
                let x = center.0 + (radius as f64 * rad.cos()) as i32;
                let y = center.1 + (radius as f64 * rad.sin()) as i32;
                if let Some(tile) = world.grid.get_i(x, y) {
                    if tile.is_mainland_soil() {
                        return Some((x, y));
                    }
                }
            }
        }
    }
    None
}

/// Stamp a filled ellipse centered at `center`. `axis` is the unit
/// direction of the major axis. Only untouched variable ocean changes.
/// Returns the number of tiles converted.
pub fn stamp_ellipse(
    world: &mut World,
    center: (i32, i32),
    major: i32,
    minor: i32,
    axis: (f64, f64),
) -> usize {
    let (half_major, half_minor) = (major / 2, minor / 2);
    if half_major == 0 || half_minor == 0 {
        return 0;
    }
    let (ax, ay) = axis;
    let (bx, by) = (-ay, ax);
    let reach = half_major.max(half_minor);
    let mut converted = 0;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (center.0 + dx, center.1 + dy);
            let Some(tile) = world.grid.get_mut_i(x, y) else {
                continue;
            };
            if tile.kind != TileType::VariableOcean || tile.source != TileSource::None {
                continue;
            }
            let u = (dx as f64 * ax + dy as f64 * ay) / half_major as f64;
            let v = (dx as f64 * bx + dy as f64 * by) / half_minor as f64;
            let r2 = u * u + v * v;
            if r2 > 1.0 {
                continue;
            }
            tile.kind = if r2 <= VERY_DEEP_CORE {
                TileType::VeryDeepSea
            } else {
                TileType::DeepSea
            };
            world.state.new_tiles.set(x as usize, y as usize, true);
            converted += 1;
        }
    }
    converted
}

/// Stamp one ellipse per island with a mainland anchor. Returns the
/// number of ellipses stamped.
pub fn generate_deep_sea(world: &mut World) -> usize {
    let centers: Vec<(i32, i32)> = world.state.islands.iter().map(|i| i.center).collect();
    let mut stamped = 0;

    for center in centers {
        let Some(anchor) = find_belt_anchor(world, center) else {
            debug!("no mainland seen from island at {:?}", center);
            continue;
        };
        let (dx, dy) = ((anchor.0 - center.0) as f64, (anchor.1 - center.1) as f64);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            continue;
        }
        let (nx, ny) = (dx / length, dy / length);
        let belt_length = (length * 2.0) as i32;

        let major = BELT_WIDTH * world.state.rng.gen_range(3..6);
        let ratio = 0.33 + world.state.rng.gen::<f64>() * 0.17;
        let minor = (belt_length as f64 * ratio) as i32;
        let mid = (
            center.0 + (nx * length / 2.0) as i32,
            center.1 + (ny * length / 2.0) as i32,
        );

        world.overlay.mark(anchor.0, anchor.1, MarkerKind::BeltAnchor);
        let tiles = stamp_ellipse(world, mid, major, minor, (-ny, nx));
        debug!(
            "deep sea for island {:?}: anchor {:?}, ellipse {}x{} at {:?}, {} tiles",
            center, anchor, major, minor, mid, tiles
        );
        stamped += 1;
    }
    stamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::world2::island::Island;
    use crate::world2::tile::{count_kind, fill_variable_ocean, stamp_fixed_border, Tile};

    fn split_world() -> World {
        let config = GeneratorConfig { width: 100, height: 100, ..Default::default() };
        let mut world = World::new(config, 12);
        fill_variable_ocean(&mut world.grid);
        stamp_fixed_border(&mut world.grid);
        for y in 3..97 {
            for x in 3..20 {
                world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::MainWalk));
            }
        }
        let mut tiles = Vec::new();
        for y in 48..=52 {
            for x in 78..=82 {
                world.grid.set(x, y, Tile::new(TileType::Soil, TileSource::Island));
                tiles.push((x, y));
            }
        }
        world.state.islands.push(Island::from_tiles(tiles).unwrap());
        world
    }

    #[test]
    fn test_anchor_is_mainland() {
        let world = split_world();
        let anchor = find_belt_anchor(&world, (80, 50)).unwrap();
        assert!(world.grid.get(anchor.0 as usize, anchor.1 as usize).is_mainland_soil());
    }

    #[test]
    fn test_anchor_missing_without_mainland() {
        let config = GeneratorConfig { width: 40, height: 40, ..Default::default() };
        let mut world = World::new(config, 1);
        fill_variable_ocean(&mut world.grid);
        assert!(find_belt_anchor(&world, (20, 20)).is_none());
    }

    #[test]
    fn test_east_scan_starts_at_zero_degrees() {
        let config = GeneratorConfig { width: 60, height: 60, ..Default::default() };
        let mut world = World::new(config, 1);
        fill_variable_ocean(&mut world.grid);
        // Both are first reached at radius 10: (40, 30) at 0°, (39, 29) at 349°.
        world.grid.set(40, 30, Tile::new(TileType::Soil, TileSource::MainWalk));
        world.grid.set(39, 29, Tile::new(TileType::Soil, TileSource::MainWalk));
        assert_eq!(find_belt_anchor(&world, (30, 30)), Some((40, 30)));
    }

    #[test]
    fn test_deep_sea_only_replaces_open_ocean() {
        let mut world = split_world();
        let soil_before = count_kind(&world.grid, TileType::Soil);
        assert_eq!(generate_deep_sea(&mut world), 1);
        assert_eq!(count_kind(&world.grid, TileType::Soil), soil_before);
        assert!(count_kind(&world.grid, TileType::DeepSea) > 0);
        assert!(count_kind(&world.grid, TileType::VeryDeepSea) > 0);
        assert_eq!(world.overlay.markers.len(), 1);
    }

    #[test]
    fn test_ellipse_core_is_very_deep() {
        let mut world = split_world();
        let n = stamp_ellipse(&mut world, (50, 50), 30, 20, (0.0, 1.0));
        assert!(n > 0);
        assert_eq!(world.grid.get(50, 50).kind, TileType::VeryDeepSea);
        // Major axis is vertical: 14 tiles north is inside, 14 east is not.
        assert_eq!(world.grid.get(50, 36).kind, TileType::DeepSea);
        assert_eq!(world.grid.get(64, 50).kind, TileType::VariableOcean);
        assert_eq!(stamp_ellipse(&mut world, (50, 50), 1, 20, (1.0, 0.0)), 0);
    }
}
