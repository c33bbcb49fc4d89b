//! Mutable generator state shared by every phase.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GeneratorConfig;
use crate::tilemap::Tilemap;

use super::island::Island;
use super::overlay::{Overlay, WorkMap};
use super::stats::TileStats;
use super::tile::{Grid, Tile};

/// Walker positions stored as parallel coordinate arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Walkers {
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
}

impl Walkers {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn push(&mut self, x: i32, y: i32) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }

    pub fn position(&self, i: usize) -> (i32, i32) {
        (self.xs[i], self.ys[i])
    }

    pub fn set(&mut self, i: usize, x: i32, y: i32) {
        self.xs[i] = x;
        self.ys[i] = y;
    }

    /// Move every walker by an offset and clamp it into `[lo, hi]` on both axes.
    pub fn translate_clamped(&mut self, dx: i32, dy: i32, lo: (i32, i32), hi: (i32, i32)) {
        for x in &mut self.xs {
            *x = (*x + dx).clamp(lo.0, hi.0);
        }
        for y in &mut self.ys {
            *y = (*y + dy).clamp(lo.1, hi.1);
        }
    }
}

/// Everything a phase may read or write besides the grid itself.
///
/// The whole struct is cloned into a layer snapshot, RNG included, so
/// replaying from a restored layer continues the exact same stream.
#[derive(Clone, Debug)]
pub struct GeneratorState {
    pub seed: u64,
    pub rng: ChaCha8Rng,

    /// Percent drawn from the configured range
    pub target_percent: u32,
    pub target_soil_count: usize,
    pub current_soil_count: usize,
    pub walkers: Walkers,
    /// Offset applied by the tectonic shift once it has run
    pub tectonic_offset: Option<(i32, i32)>,
    pub mask: Option<Tilemap<f64>>,

    /// Tiles written by the phase currently executing
    pub new_tiles: Tilemap<bool>,

    // Coastal carver
    pub excluded: Tilemap<bool>,
    pub multiplier: f64,
    pub cliff_streak: u32,
    pub shallow_streak: u32,

    pub islands: Vec<Island>,
    /// Scratch map of the harbor search
    pub work: Option<WorkMap>,

    /// Display label of the current phase, including outcome suffixes
    pub phase_label: String,
    pub stats: Option<TileStats>,
    pub finished: bool,
}

impl GeneratorState {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            target_percent: 0,
            target_soil_count: 0,
            current_soil_count: 0,
            walkers: Walkers::default(),
            tectonic_offset: None,
            mask: None,
            new_tiles: Tilemap::new(width, height),
            excluded: Tilemap::new(width, height),
            multiplier: 0.0,
            cliff_streak: 0,
            shallow_streak: 0,
            islands: Vec::new(),
            work: None,
            phase_label: String::new(),
            stats: None,
            finished: false,
        }
    }

    /// Soil grown after the tectonic shift belongs to the secondary walk.
    pub fn shifted(&self) -> bool {
        self.tectonic_offset.is_some()
    }
}

/// The single owned instance a generator mutates: configuration, grid,
/// state and the overlay of the phase on display.
#[derive(Clone, Debug)]
pub struct World {
    pub config: GeneratorConfig,
    pub grid: Grid,
    pub state: GeneratorState,
    pub overlay: Overlay,
}

impl World {
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        let (width, height) = (config.width, config.height);
        Self {
            config,
            grid: Grid::new(width, height),
            state: GeneratorState::new(width, height, seed),
            overlay: Overlay::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Back to the empty baseline with a freshly seeded RNG.
    pub fn reset(&mut self) {
        let seed = self.state.seed;
        self.grid.fill(Tile::default());
        self.state = GeneratorState::new(self.width(), self.height(), seed);
        self.overlay.clear();
    }

    /// Prepare per-phase bookkeeping before a phase executes.
    pub fn begin_phase(&mut self, label: &str) {
        self.state.new_tiles.fill(false);
        self.state.work = None;
        self.overlay.clear();
        self.state.phase_label = label.to_string();
    }

    pub fn append_label(&mut self, suffix: &str) {
        self.state.phase_label.push_str(suffix);
    }

    /// Record a tile written by the current phase.
    pub fn mark_new(&mut self, x: usize, y: usize) {
        self.state.new_tiles.set(x, y, true);
    }

    pub fn new_tile_count(&self) -> usize {
        self.state.new_tiles.iter().filter(|(_, _, n)| **n).count()
    }
}
