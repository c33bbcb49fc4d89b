//! Aggregate tile counts for the summary panel.

use super::tile::{Grid, TileType};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileStats {
    pub width: usize,
    pub height: usize,
    pub target_percent: u32,
    /// Per-type counts, indexed in `TileType::all()` order. Lake tiles are
    /// counted under `lakes` instead of their own type.
    pub counts: [usize; 8],
    pub lakes: usize,
}

impl TileStats {
    pub fn collect(grid: &Grid, target_percent: u32) -> Self {
        let mut stats = Self {
            width: grid.width,
            height: grid.height,
            target_percent,
            ..Default::default()
        };
        for (_, _, tile) in grid.iter() {
            if tile.is_lake {
                stats.lakes += 1;
            } else {
                stats.counts[type_index(tile.kind)] += 1;
            }
        }
        stats
    }

    pub fn count(&self, kind: TileType) -> usize {
        self.counts[type_index(kind)]
    }

    pub fn total(&self) -> usize {
        self.width * self.height
    }

    /// Text lines: size, target, then one line per type and lakes.
    pub fn summary_lines(&self) -> Vec<String> {
        let total = self.total().max(1) as f64;
        let mut lines = vec![
            format!("Size:   {} x {}", self.width, self.height),
            format!("Target: {}%", self.target_percent),
            "-----------------".to_string(),
        ];
        for &kind in TileType::all() {
            let n = self.count(kind);
            lines.push(format!(
                "{:<10} {:>6} ({:>5.1}%)",
                format!("{}:", kind.display_name()),
                n,
                n as f64 / total * 100.0
            ));
        }
        lines.push(format!(
            "{:<10} {:>6} ({:>5.1}%)",
            "Lake:",
            self.lakes,
            self.lakes as f64 / total * 100.0
        ));
        lines
    }
}

fn type_index(kind: TileType) -> usize {
    match kind {
        TileType::VariableOcean => 0,
        TileType::Soil => 1,
        TileType::FixedOcean => 2,
        TileType::Transit => 3,
        TileType::Cliff => 4,
        TileType::Shallow => 5,
        TileType::DeepSea => 6,
        TileType::VeryDeepSea => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world2::tile::{Tile, TileSource};

    #[test]
    fn test_lakes_counted_separately() {
        let mut grid = Grid::new(20, 20);
        grid.set(5, 5, Tile::new(TileType::Soil, TileSource::MainWalk));
        grid.get_mut(6, 6).is_lake = true;
        let stats = TileStats::collect(&grid, 25);
        assert_eq!(stats.count(TileType::Soil), 1);
        assert_eq!(stats.lakes, 1);
        assert_eq!(stats.count(TileType::VariableOcean), 398);
        let sum: usize = stats.counts.iter().sum::<usize>() + stats.lakes;
        assert_eq!(sum, stats.total());
    }

    #[test]
    fn test_summary_has_line_per_type() {
        let stats = TileStats::collect(&Grid::new(20, 20), 20);
        let lines = stats.summary_lines();
        assert_eq!(lines.len(), 3 + TileType::all().len() + 1);
        assert!(lines[0].contains("20 x 20"));
        assert!(lines.iter().any(|l| l.starts_with("Lake:")));
    }
}
