//! Lake classification: water that cannot reach the fixed-ocean border.

use std::collections::VecDeque;

use crate::tilemap::Tilemap;

use super::tile::{Grid, TileType};

/// Flood from every fixed-ocean tile through non-land tiles and mark the
/// water left unreached as lake. Previous lake flags are discarded.
/// Returns the number of lake tiles.
pub fn classify_lakes(grid: &mut Grid) -> usize {
    let mut reached = Tilemap::new_with(grid.width, grid.height, false);
    let mut queue = VecDeque::new();

    for (x, y, tile) in grid.iter() {
        if tile.kind == TileType::FixedOcean {
            reached.set(x, y, true);
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in grid.neighbors(x, y) {
            if *reached.get(nx, ny) || grid.get(nx, ny).kind.is_land() {
                continue;
            }
            reached.set(nx, ny, true);
            queue.push_back((nx, ny));
        }
    }

    let mut lakes = 0;
    for (x, y, tile) in grid.iter_mut() {
        tile.is_lake = tile.kind.is_water() && !*reached.get(x, y);
        if tile.is_lake {
            lakes += 1;
        }
    }
    lakes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world2::tile::{fill_variable_ocean, stamp_fixed_border, Tile, TileSource};

    fn bordered(size: usize) -> Grid {
        let mut grid = Grid::new(size, size);
        fill_variable_ocean(&mut grid);
        stamp_fixed_border(&mut grid);
        grid
    }

    fn ring(grid: &mut Grid, x0: usize, y0: usize, x1: usize, y1: usize, kind: TileType) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                if x == x0 || x == x1 || y == y0 || y == y1 {
                    grid.set(x, y, Tile::new(kind, TileSource::MainWalk));
                }
            }
        }
    }

    #[test]
    fn test_enclosed_water_is_lake() {
        let mut grid = bordered(30);
        ring(&mut grid, 10, 10, 15, 15, TileType::Soil);
        grid.get_mut(12, 12).kind = TileType::Shallow;
        assert_eq!(classify_lakes(&mut grid), 16);
        assert!(grid.get(12, 12).is_lake);
        assert!(grid.get(11, 11).is_lake);
        assert!(!grid.get(10, 10).is_lake);
        assert!(!grid.get(5, 5).is_lake);
    }

    #[test]
    fn test_diagonal_gap_does_not_drain() {
        let mut grid = bordered(30);
        ring(&mut grid, 10, 10, 14, 14, TileType::Cliff);
        grid.set(10, 10, Tile::default());
        // corner removed: (11, 11) only touches it diagonally, but the
        // corner tile itself connects to the outside
        let lakes = classify_lakes(&mut grid);
        assert!(!grid.get(10, 10).is_lake);
        assert_eq!(lakes, 9);
    }

    #[test]
    fn test_lake_flags_are_recomputed() {
        let mut grid = bordered(30);
        grid.get_mut(20, 20).is_lake = true;
        assert_eq!(classify_lakes(&mut grid), 0);
        assert!(!grid.get(20, 20).is_lake);
    }

    #[test]
    fn test_no_lake_has_water_path_to_border() {
        let mut grid = bordered(40);
        ring(&mut grid, 8, 8, 30, 30, TileType::Transit);
        ring(&mut grid, 14, 14, 20, 20, TileType::Soil);
        grid.set(8, 19, Tile::default());
        classify_lakes(&mut grid);
        // The outer ring has a gap, the inner one does not.
        assert!(!grid.get(10, 10).is_lake);
        assert!(grid.get(17, 17).is_lake);
    }
}
