//! Large island records.

/// Harbor data attached to an island by the harbor search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HarborSites {
    /// Island-side port, opposite the nearest deep sea
    pub port: Option<(i32, i32)>,
    /// Mainland soil found after the bay mouth
    pub candidate_a: Option<(i32, i32)>,
    /// First mainland soil on the spiral
    pub candidate_b: Option<(i32, i32)>,
    /// Bay mouth: first water after B
    pub candidate_c: Option<(i32, i32)>,
}

/// A large island placed in a vast-ocean region.
///
/// Tiles are recorded once at placement; only `harbor` is written later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Island {
    pub tiles: Vec<(usize, usize)>,
    /// Bounding box (min_x, min_y, max_x, max_y), inclusive
    pub bounds: (usize, usize, usize, usize),
    pub center: (i32, i32),
    pub harbor: HarborSites,
}

impl Island {
    /// Build the record from its tiles. `None` for an empty tile list.
    pub fn from_tiles(tiles: Vec<(usize, usize)>) -> Option<Self> {
        let first = *tiles.first()?;
        let mut bounds = (first.0, first.1, first.0, first.1);
        for &(x, y) in &tiles {
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }
        let center = (
            ((bounds.0 + bounds.2) / 2) as i32,
            ((bounds.1 + bounds.3) / 2) as i32,
        );
        Some(Self {
            tiles,
            bounds,
            center,
            harbor: HarborSites::default(),
        })
    }

    pub fn width(&self) -> usize {
        self.bounds.2 - self.bounds.0 + 1
    }

    pub fn height(&self) -> usize {
        self.bounds.3 - self.bounds.1 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_center() {
        let island = Island::from_tiles(vec![(10, 12), (14, 12), (12, 16)]).unwrap();
        assert_eq!(island.bounds, (10, 12, 14, 16));
        assert_eq!(island.center, (12, 14));
        assert_eq!(island.width(), 5);
        assert_eq!(island.height(), 5);
        assert!(Island::from_tiles(Vec::new()).is_none());
    }
}
