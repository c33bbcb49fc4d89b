//! PNG export of island maps.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::world2::overlay::{MarkerKind, Overlay};
use crate::world2::tile::{Grid, Tile, TileType};

/// Color of a tile. Lakes override their underlying type.
pub fn tile_color(tile: &Tile) -> [u8; 3] {
    if tile.is_lake {
        return [70, 150, 210];
    }
    match tile.kind {
        TileType::VariableOcean => [30, 90, 160],
        TileType::FixedOcean => [20, 60, 120],
        TileType::Shallow => [90, 170, 200],
        TileType::DeepSea => [15, 45, 110],
        TileType::VeryDeepSea => [8, 25, 70],
        TileType::Soil => [90, 150, 70],
        TileType::Transit => [190, 170, 110],
        TileType::Cliff => [120, 110, 100],
    }
}

fn marker_color(kind: MarkerKind) -> [u8; 3] {
    match kind {
        MarkerKind::SpiralSample => [230, 230, 120],
        MarkerKind::HarborCandidate => [230, 60, 60],
        MarkerKind::IslandPort => [250, 150, 30],
        MarkerKind::BeltAnchor => [200, 60, 200],
    }
}

/// Render a grid to an image, `scale` pixels per tile.
pub fn render_map(grid: &Grid, overlay: Option<&Overlay>, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage =
        ImageBuffer::new(grid.width as u32 * scale, grid.height as u32 * scale);

    for (x, y, tile) in grid.iter() {
        fill_cell(&mut img, x as u32, y as u32, scale, tile_color(tile));
    }

    if let Some(overlay) = overlay {
        for rect in &overlay.rects {
            let color = Rgb([255, 255, 255]);
            for x in rect.x..rect.x + rect.w {
                for y in [rect.y, rect.y + rect.h - 1] {
                    put_scaled(&mut img, grid, x, y, scale, color);
                }
            }
            for y in rect.y..rect.y + rect.h {
                for x in [rect.x, rect.x + rect.w - 1] {
                    put_scaled(&mut img, grid, x, y, scale, color);
                }
            }
        }
        let mut markers: Vec<_> = overlay.markers.iter().collect();
        markers.sort_by_key(|m| m.kind != MarkerKind::SpiralSample);
        for marker in markers {
            put_scaled(&mut img, grid, marker.x, marker.y, scale, Rgb(marker_color(marker.kind)));
        }
    }

    img
}

fn fill_cell(img: &mut RgbImage, x: u32, y: u32, scale: u32, color: [u8; 3]) {
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(x * scale + dx, y * scale + dy, Rgb(color));
        }
    }
}

fn put_scaled(img: &mut RgbImage, grid: &Grid, x: i32, y: i32, scale: u32, color: Rgb<u8>) {
    if grid.contains(x, y) {
        fill_cell(img, x as u32, y as u32, scale, color.0);
    }
}

/// Export a grid (and optional overlay) as a PNG.
pub fn export_map_png(
    grid: &Grid,
    overlay: Option<&Overlay>,
    scale: u32,
    path: &str,
) -> Result<(), image::ImageError> {
    render_map(grid, overlay, scale).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world2::overlay::Rect;
    use crate::world2::tile::TileSource;

    #[test]
    fn test_render_scales_pixels() {
        let mut grid = Grid::new(20, 20);
        grid.set(4, 5, Tile::new(TileType::Soil, TileSource::MainWalk));
        let img = render_map(&grid, None, 3);
        assert_eq!(img.dimensions(), (60, 60));
        assert_eq!(img.get_pixel(12, 15).0, tile_color(grid.get(4, 5)));
        assert_eq!(img.get_pixel(14, 17).0, tile_color(grid.get(4, 5)));
        assert_eq!(img.get_pixel(15, 15).0, tile_color(grid.get(5, 5)));
    }

    #[test]
    fn test_overlay_drawn_inside_bounds_only() {
        let grid = Grid::new(20, 20);
        let overlay = Overlay {
            rects: vec![Rect { x: 18, y: 18, w: 5, h: 5 }],
            markers: Vec::new(),
        };
        let img = render_map(&grid, Some(&overlay), 1);
        assert_eq!(img.get_pixel(18, 18).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(19, 19).0, tile_color(grid.get(19, 19)));
    }
}
