//! Tile model for the island map and grid-level helpers.

use crate::tilemap::{Tilemap, DIR4};

/// Width of the permanent fixed-ocean frame around the map.
pub const BORDER: i32 = 3;

/// Terrain class of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum TileType {
    /// Open water that later phases may convert
    #[default]
    VariableOcean,
    Soil,
    /// Permanent border water
    FixedOcean,
    /// Stepping-stone land on a sea route
    Transit,
    Cliff,
    Shallow,
    DeepSea,
    VeryDeepSea,
}

impl TileType {
    pub fn all() -> &'static [TileType] {
        &[
            TileType::VariableOcean,
            TileType::Soil,
            TileType::FixedOcean,
            TileType::Transit,
            TileType::Cliff,
            TileType::Shallow,
            TileType::DeepSea,
            TileType::VeryDeepSea,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TileType::VariableOcean => "Var Ocean",
            TileType::Soil => "Soil",
            TileType::FixedOcean => "Fix Ocean",
            TileType::Transit => "Transit",
            TileType::Cliff => "Cliff",
            TileType::Shallow => "Shallow",
            TileType::DeepSea => "Deep Sea",
            TileType::VeryDeepSea => "Very Deep",
        }
    }

    /// Soil, transit islands and cliffs block water.
    pub fn is_land(self) -> bool {
        matches!(self, TileType::Soil | TileType::Transit | TileType::Cliff)
    }

    pub fn is_water(self) -> bool {
        !self.is_land()
    }
}

/// Which generation step produced a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum TileSource {
    #[default]
    None,
    /// Soil grown before the tectonic shift
    MainWalk,
    /// Soil grown after the tectonic shift
    SecondaryWalk,
    Mixed,
    /// Stepping-stone island of an A route
    Bridge,
    /// Large or single-tile island
    Island,
    /// Water marked by an A route segment
    TransitPathA,
    /// Small island on a zigzag B route
    RouteIslandB,
    /// Water marked by a B route
    RoutePathB,
}

impl TileSource {
    /// Sources that make up the continent proper.
    pub fn is_mainland(self) -> bool {
        matches!(
            self,
            TileSource::MainWalk | TileSource::SecondaryWalk | TileSource::Mixed
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Tile {
    pub kind: TileType,
    pub source: TileSource,
    /// Derived by the lake pass only
    pub is_lake: bool,
}

impl Tile {
    pub const fn new(kind: TileType, source: TileSource) -> Self {
        Self {
            kind,
            source,
            is_lake: false,
        }
    }

    pub fn is_mainland_soil(&self) -> bool {
        self.kind == TileType::Soil && self.source.is_mainland()
    }

    /// Any land that does not belong to an island.
    pub fn is_non_island_land(&self) -> bool {
        self.kind.is_land() && self.source != TileSource::Island
    }
}

pub type Grid = Tilemap<Tile>;

/// True for cells outside the fixed-ocean frame.
pub fn in_interior(grid: &Grid, x: i32, y: i32) -> bool {
    x >= BORDER
        && y >= BORDER
        && x < grid.width as i32 - BORDER
        && y < grid.height as i32 - BORDER
}

/// True for cells inside the fixed-ocean frame.
pub fn in_border(grid: &Grid, x: usize, y: usize) -> bool {
    !in_interior(grid, x as i32, y as i32)
}

/// Land tile with at least one water 4-neighbor.
pub fn is_coastal(grid: &Grid, x: usize, y: usize) -> bool {
    let kind = grid.get(x, y).kind;
    if kind != TileType::Soil && kind != TileType::Transit {
        return false;
    }
    grid.neighbors(x, y).any(|(nx, ny)| grid.get(nx, ny).kind.is_water())
}

/// Number of 4-neighbors matching a predicate.
pub fn count_neighbors4(grid: &Grid, x: usize, y: usize, pred: impl Fn(&Tile) -> bool) -> usize {
    DIR4.iter()
        .filter_map(|&(dx, dy)| grid.get_i(x as i32 + dx, y as i32 + dy))
        .filter(|t| pred(*t))
        .count()
}

/// Turn every tile into plain variable ocean.
pub fn fill_variable_ocean(grid: &mut Grid) {
    grid.fill(Tile::new(TileType::VariableOcean, TileSource::None));
}

/// Stamp the fixed-ocean frame, overwriting whatever is there.
pub fn stamp_fixed_border(grid: &mut Grid) {
    let (w, h) = (grid.width, grid.height);
    for y in 0..h {
        for x in 0..w {
            if in_border(grid, x, y) {
                grid.set(x, y, Tile::new(TileType::FixedOcean, TileSource::None));
            }
        }
    }
}

/// Count tiles of one type.
pub fn count_kind(grid: &Grid, kind: TileType) -> usize {
    grid.iter().filter(|(_, _, t)| t.kind == kind).count()
}
