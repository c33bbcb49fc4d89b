//! ASCII rendering and export for generated island maps
//!
//! One character per tile, with overlay markers optionally drawn on top.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::world2::overlay::{MarkerKind, Overlay};
use crate::world2::tile::{Grid, Tile, TileType};
use crate::world2::Generator;

/// Get ASCII character for a tile
pub fn tile_char(tile: &Tile) -> char {
    if tile.is_lake {
        return 'o';
    }
    match tile.kind {
        TileType::VariableOcean => '.',
        TileType::Soil => '#',
        TileType::FixedOcean => ' ',
        TileType::Transit => '+',
        TileType::Cliff => '^',
        TileType::Shallow => ',',
        TileType::DeepSea => '~',
        TileType::VeryDeepSea => '=',
    }
}

pub fn marker_char(kind: MarkerKind) -> char {
    match kind {
        MarkerKind::SpiralSample => '*',
        MarkerKind::HarborCandidate => 'H',
        MarkerKind::IslandPort => 'P',
        MarkerKind::BeltAnchor => 'X',
    }
}

/// Render a grid to an ASCII string, one line per row.
pub fn render_ascii_map(grid: &Grid, overlay: Option<&Overlay>) -> String {
    let mut chars: Vec<char> = grid.iter().map(|(_, _, t)| tile_char(t)).collect();

    if let Some(overlay) = overlay {
        // Spiral trails first so candidates stay visible on top of them
        let mut markers: Vec<_> = overlay.markers.iter().collect();
        markers.sort_by_key(|m| m.kind != MarkerKind::SpiralSample);
        for marker in markers {
            if grid.contains(marker.x, marker.y) {
                let idx = grid.index(marker.x as usize, marker.y as usize);
                chars[idx] = marker_char(marker.kind);
            }
        }
    }

    let mut result = String::with_capacity((grid.width + 1) * grid.height);
    for row in chars.chunks(grid.width) {
        result.extend(row);
        result.push('\n');
    }
    result
}

/// Generate legend for tile characters
pub fn tile_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    legend.push_str("  . Var Ocean   ' ' Fix Ocean  , Shallow\n");
    legend.push_str("  ~ Deep Sea    = Very Deep    o Lake\n");
    legend.push_str("  # Soil        + Transit      ^ Cliff\n");
    legend.push_str("  * Spiral      H Harbor       P Port      X Belt anchor\n");
    legend
}

/// Print the generator's current map to stdout
pub fn print_ascii_map(generator: &Generator) {
    print!("{}", render_ascii_map(generator.grid(), Some(generator.overlay())));
}

/// Export the current map, its statistics and the legend to a text file
pub fn export_map_file(generator: &Generator, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let grid = generator.grid();

    writeln!(file, "=== ISLAND GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {}", generator.state().seed)?;
    writeln!(file, "Size: {}x{}", grid.width, grid.height)?;
    writeln!(file, "Phase: {}", generator.phase_label())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_ascii_map(grid, Some(generator.overlay())))?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    for line in generator.summary_lines() {
        writeln!(file, "{}", line)?;
    }
    writeln!(file)?;

    write!(file, "{}", tile_legend())?;
    Ok(())
}
