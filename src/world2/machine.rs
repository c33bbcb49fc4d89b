//! Step-driven phase machine.
//!
//! `Generator` owns the world, the phase table and one snapshot layer per
//! phase. Moving onto a phase whose layer is complete restores the
//! snapshot; otherwise the phase executes and its result is captured.

use log::{debug, info};

use crate::config::{ConfigError, GeneratorConfig};

use super::layers::LayerStore;
use super::overlay::Overlay;
use super::phase::PhaseProcessor;
use super::phases::default_phases;
use super::state::{GeneratorState, World};
use super::stats::TileStats;
use super::tile::Grid;

pub struct Generator {
    world: World,
    phases: Vec<Box<dyn PhaseProcessor>>,
    layers: LayerStore,
    current: usize,
}

impl Generator {
    /// Validate the configuration and run phase 0.
    pub fn new(config: GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let phases = default_phases();
        let layers = LayerStore::new(phases.len());
        info!(
            "generator {}x{} seed {} ({} phases)",
            config.width,
            config.height,
            seed,
            phases.len()
        );
        let mut generator = Self {
            world: World::new(config, seed),
            phases,
            layers,
            current: 0,
        };
        generator.execute_current();
        Ok(generator)
    }

    /// Run the phase contract for the current index.
    fn execute_current(&mut self) {
        let idx = self.current;
        let (Some(phase), Some(layer)) = (self.phases.get(idx), self.layers.get_mut(idx)) else {
            return;
        };

        phase.initialize(&mut self.world, layer);
        if layer.is_complete {
            debug!("{}. {} (restored)", idx, self.world.state.phase_label);
        } else {
            self.world.begin_phase(phase.name());
            phase.before(&mut self.world);
            phase.execute(&mut self.world);
            info!("{}. {}", idx, self.world.state.phase_label);
            phase.tear_down(&self.world, layer);
        }
        phase.prepare_display(&mut self.world);
        phase.finalize(&mut self.world);
    }

    /// Advance one phase. After a reset phase 0 has no result yet, so it
    /// runs first and the call still ends one phase further on. Returns
    /// false at the end.
    pub fn next(&mut self) -> bool {
        let pending = self
            .layers
            .get(self.current)
            .is_some_and(|layer| !layer.is_complete);
        if pending {
            self.execute_current();
        }
        if self.current + 1 >= self.phases.len() {
            return false;
        }
        self.current += 1;
        self.execute_current();
        true
    }

    /// Step back one phase, restoring its snapshot. No-op at phase 0.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.execute_current();
        true
    }

    pub fn run_to_end(&mut self) {
        while self.next() {}
    }

    /// Advance until `target` (clamped to the last phase) is current.
    pub fn run_to(&mut self, target: usize) {
        let target = target.min(self.phases.len() - 1);
        while self.current < target && self.next() {}
    }

    /// Forget every layer and return to the empty baseline at phase 0.
    pub fn reset(&mut self) {
        for (phase, layer) in self.phases.iter().zip(self.layers.iter_mut()) {
            phase.reset(layer);
        }
        self.world.reset();
        self.current = 0;
        info!("generator reset (seed {})", self.world.state.seed);
    }

    pub fn is_finished(&self) -> bool {
        self.world.state.finished
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Index-prefixed label of the current phase, outcome suffix included.
    pub fn phase_label(&self) -> String {
        format!("{}. {}", self.current, self.world.state.phase_label)
    }

    pub fn grid(&self) -> &Grid {
        &self.world.grid
    }

    pub fn overlay(&self) -> &Overlay {
        &self.world.overlay
    }

    pub fn state(&self) -> &GeneratorState {
        &self.world.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// Tile statistics of the current grid. The final phase caches them;
    /// earlier phases compute them on demand.
    pub fn stats(&self) -> TileStats {
        match &self.world.state.stats {
            Some(stats) => stats.clone(),
            None => TileStats::collect(&self.world.grid, self.world.state.target_percent),
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.stats().summary_lines()
    }
}
