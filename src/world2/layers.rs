//! Per-phase snapshot layers.
//!
//! A layer holds a full copy of the grid, the generator state (RNG
//! included) and the overlay taken right after its phase executed.
//! Re-entering a completed phase restores the copy instead of running
//! the phase again.

use super::overlay::Overlay;
use super::state::{GeneratorState, World};
use super::tile::Grid;

#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub is_complete: bool,
    tiles: Option<Grid>,
    state: Option<GeneratorState>,
    overlay: Overlay,
}

impl Layer {
    /// Snapshot the world and mark the layer complete.
    pub fn capture(&mut self, world: &World) {
        self.tiles = Some(world.grid.clone());
        self.state = Some(world.state.clone());
        self.overlay = world.overlay.clone();
        self.is_complete = true;
    }

    /// Copy the snapshot back into the world. Returns false when the layer
    /// holds no snapshot.
    pub fn restore(&self, world: &mut World) -> bool {
        match (&self.tiles, &self.state) {
            (Some(tiles), Some(state)) if self.is_complete => {
                world.grid.clone_from(tiles);
                world.state.clone_from(state);
                world.overlay.clone_from(&self.overlay);
                true
            }
            _ => false,
        }
    }

    /// Drop the snapshot and mark the layer incomplete.
    pub fn clear(&mut self) {
        self.is_complete = false;
        self.tiles = None;
        self.state = None;
        self.overlay.clear();
    }

    pub fn tiles(&self) -> Option<&Grid> {
        self.tiles.as_ref()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }
}

/// One layer per phase, index-aligned with the phase list.
#[derive(Clone, Debug, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn new(count: usize) -> Self {
        Self {
            layers: vec![Layer::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
        self.layers.iter_mut()
    }

    pub fn completed(&self) -> usize {
        self.layers.iter().filter(|l| l.is_complete).count()
    }
}
