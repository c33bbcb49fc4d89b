//! Visualization overlays produced alongside the grid.
//!
//! Overlays never affect generation; they describe what a phase searched
//! for so a viewer can draw it on top of the map.

use crate::tilemap::Tilemap;

/// Axis-aligned tile rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// Cell visited by a spiral search
    SpiralSample,
    /// Harbor candidate point (A, B or C)
    HarborCandidate,
    /// Island-side port
    IslandPort,
    /// Mainland point that oriented a deep-sea belt
    BeltAnchor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    pub x: i32,
    pub y: i32,
    pub kind: MarkerKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    pub rects: Vec<Rect>,
    pub markers: Vec<Marker>,
}

impl Overlay {
    pub fn clear(&mut self) {
        self.rects.clear();
        self.markers.clear();
    }

    pub fn mark(&mut self, x: i32, y: i32, kind: MarkerKind) {
        self.markers.push(Marker { x, y, kind });
    }
}

/// Per-cell scratch data written during a search and turned into
/// markers when the phase is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WorkMark {
    #[default]
    None,
    Spiral,
    Candidate,
    Port,
}

pub type WorkMap = Tilemap<WorkMark>;

/// Replace the overlay's markers with the contents of a work map.
pub fn markers_from_work(work: &WorkMap, overlay: &mut Overlay) {
    overlay.markers.clear();
    for (x, y, mark) in work.iter() {
        let kind = match mark {
            WorkMark::None => continue,
            WorkMark::Spiral => MarkerKind::SpiralSample,
            WorkMark::Candidate => MarkerKind::HarborCandidate,
            WorkMark::Port => MarkerKind::IslandPort,
        };
        overlay.mark(x as i32, y as i32, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_from_work_skips_empty_cells() {
        let mut work = WorkMap::new(4, 4);
        work.set(1, 1, WorkMark::Spiral);
        work.set(2, 3, WorkMark::Candidate);
        let mut overlay = Overlay::default();
        overlay.mark(0, 0, MarkerKind::BeltAnchor);
        markers_from_work(&work, &mut overlay);
        assert_eq!(overlay.markers.len(), 2);
        assert_eq!(overlay.markers[1], Marker { x: 2, y: 3, kind: MarkerKind::HarborCandidate });
    }
}
