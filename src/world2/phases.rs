//! The concrete phase table.

use log::{debug, info};

use super::centering::center_land;
use super::cliffs::{carve_coast, init_carver};
use super::deep_sea::generate_deep_sea;
use super::harbor::search_harbors;
use super::island_shallows::adjust_island_shallows;
use super::islands::{place_quad_islands, place_random_islands};
use super::lakes::classify_lakes;
use super::mask::{draw_soil_target, generate_mask};
use super::overlay::{markers_from_work, WorkMap};
use super::phase::PhaseProcessor;
use super::soil::{grow_soil, tectonic_shift};
use super::state::World;
use super::stats::TileStats;
use super::tile::{fill_variable_ocean, stamp_fixed_border};
use super::transit::build_transit_routes;

/// Milestone at which the tectonic shift runs.
pub const TECTONIC_MILESTONE: u32 = 3;

const NO_ISLANDS: &str = " (No islands found)";
const SKIPPED: &str = " (Skipped)";

pub struct InitPhase;

impl PhaseProcessor for InitPhase {
    fn name(&self) -> &str {
        "Init"
    }

    fn execute(&self, world: &mut World) {
        init_carver(&mut world.state, &world.config);
    }
}

pub struct SeaPhase;

impl PhaseProcessor for SeaPhase {
    fn name(&self) -> &str {
        "Sea (Variable Ocean)"
    }

    fn execute(&self, world: &mut World) {
        fill_variable_ocean(&mut world.grid);
    }
}

pub struct FixedSeaPhase;

impl PhaseProcessor for FixedSeaPhase {
    fn name(&self) -> &str {
        "Fixed Sea (Border)"
    }

    fn execute(&self, world: &mut World) {
        stamp_fixed_border(&mut world.grid);
    }
}

pub struct MaskPhase;

impl PhaseProcessor for MaskPhase {
    fn name(&self) -> &str {
        "Mask Gen"
    }

    fn execute(&self, world: &mut World) {
        let (w, h) = (world.width(), world.height());
        let mask = generate_mask(world.config.mask_shape, w, h, &mut world.state.rng);
        world.state.mask = Some(mask);
        let (pct, count) = draw_soil_target(&world.config, &mut world.state.rng);
        world.state.target_percent = pct;
        world.state.target_soil_count = count;
        world.append_label(&format!(" ({}, target {}% = {} tiles)", world.config.mask_shape, pct, count));
    }
}

/// One soil growth milestone, 1..=10.
pub struct SoilPhase {
    milestone: u32,
    name: String,
}

impl SoilPhase {
    pub fn new(milestone: u32) -> Self {
        Self {
            milestone,
            name: format!("Soil {}%", milestone * 10),
        }
    }
}

impl PhaseProcessor for SoilPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, world: &mut World) {
        grow_soil(world, self.milestone);
        let label = format!(
            " ({}/{})",
            world.state.current_soil_count, world.state.target_soil_count
        );
        world.append_label(&label);
    }
}

pub struct TectonicPhase;

impl PhaseProcessor for TectonicPhase {
    fn name(&self) -> &str {
        "Tectonic Shift"
    }

    fn execute(&self, world: &mut World) {
        let (dx, dy) = tectonic_shift(world);
        world.append_label(&format!(" (offset: {}, {})", dx, dy));
    }
}

pub struct CenteringPhase;

impl PhaseProcessor for CenteringPhase {
    fn name(&self) -> &str {
        "Centering"
    }

    fn execute(&self, world: &mut World) {
        if !world.config.centering {
            world.append_label(SKIPPED);
            return;
        }
        if center_land(world).is_none() {
            world.append_label(" (No land)");
        }
    }
}

pub struct QuadIslandsPhase;

impl PhaseProcessor for QuadIslandsPhase {
    fn name(&self) -> &str {
        "Islands (Quad)"
    }

    fn execute(&self, world: &mut World) {
        let placed = place_quad_islands(world);
        if placed == 0 {
            world.append_label(" (No vast ocean found)");
        } else {
            world.append_label(&format!(" ({} placed)", placed));
        }
    }
}

pub struct RandomIslandsPhase;

impl PhaseProcessor for RandomIslandsPhase {
    fn name(&self) -> &str {
        "Islands (Rand)"
    }

    fn execute(&self, world: &mut World) {
        let placed = place_random_islands(world);
        debug!("{} single-tile islands", placed);
    }
}

pub struct TransitPhase;

impl PhaseProcessor for TransitPhase {
    fn name(&self) -> &str {
        "Transit Routes"
    }

    fn execute(&self, world: &mut World) {
        if world.state.islands.is_empty() {
            world.append_label(NO_ISLANDS);
            return;
        }
        let built = build_transit_routes(world);
        world.append_label(&format!(" ({}/{} routes)", built, world.state.islands.len()));
    }
}

pub struct IslandShallowPhase;

impl PhaseProcessor for IslandShallowPhase {
    fn name(&self) -> &str {
        "Island Shallow Adjust"
    }

    fn execute(&self, world: &mut World) {
        match adjust_island_shallows(world) {
            Some(n) => debug!("{} ring shallows", n),
            None => world.append_label(SKIPPED),
        }
    }
}

pub struct DeepSeaPhase;

impl PhaseProcessor for DeepSeaPhase {
    fn name(&self) -> &str {
        "Deep Sea"
    }

    fn execute(&self, world: &mut World) {
        if world.state.islands.is_empty() {
            world.append_label(NO_ISLANDS);
            return;
        }
        if generate_deep_sea(world) == 0 {
            world.append_label(" (No mainland found)");
        }
    }
}

pub struct HarborPhase;

impl PhaseProcessor for HarborPhase {
    fn name(&self) -> &str {
        "Harbor Search"
    }

    fn before(&self, world: &mut World) {
        world.state.work = Some(WorkMap::new(world.width(), world.height()));
    }

    fn execute(&self, world: &mut World) {
        if world.state.islands.is_empty() {
            world.append_label(NO_ISLANDS);
            return;
        }
        let complete = search_harbors(world);
        if complete < world.state.islands.len() {
            world.append_label(&format!(
                " ({}/{} complete)",
                complete,
                world.state.islands.len()
            ));
        }
    }

    fn prepare_display(&self, world: &mut World) {
        if let Some(work) = &world.state.work {
            markers_from_work(work, &mut world.overlay);
        }
    }
}

pub struct CliffsPhase;

impl PhaseProcessor for CliffsPhase {
    fn name(&self) -> &str {
        "Cliffs & Shallows"
    }

    fn execute(&self, world: &mut World) {
        let report = carve_coast(world);
        world.append_label(&format!(
            " ({} cliffs, {} shallows)",
            report.cliffs, report.shallows
        ));
    }
}

pub struct LakesPhase;

impl PhaseProcessor for LakesPhase {
    fn name(&self) -> &str {
        "Lakes Final"
    }

    fn execute(&self, world: &mut World) {
        let lakes = classify_lakes(&mut world.grid);
        world.state.stats = Some(TileStats::collect(&world.grid, world.state.target_percent));
        world.append_label(&format!(" ({} lake tiles)", lakes));
    }
}

pub struct EndPhase;

impl PhaseProcessor for EndPhase {
    fn name(&self) -> &str {
        "End"
    }

    fn execute(&self, world: &mut World) {
        world.state.finished = true;
    }

    fn finalize(&self, world: &mut World) {
        if world.state.finished {
            info!("generation finished (seed {})", world.state.seed);
        }
    }
}

/// Every phase in pipeline order.
pub fn default_phases() -> Vec<Box<dyn PhaseProcessor>> {
    let mut phases: Vec<Box<dyn PhaseProcessor>> = vec![
        Box::new(InitPhase),
        Box::new(SeaPhase),
        Box::new(FixedSeaPhase),
        Box::new(MaskPhase),
    ];
    for milestone in 1..=TECTONIC_MILESTONE {
        phases.push(Box::new(SoilPhase::new(milestone)));
    }
    phases.push(Box::new(TectonicPhase));
    for milestone in TECTONIC_MILESTONE + 1..=10 {
        phases.push(Box::new(SoilPhase::new(milestone)));
    }
    phases.extend([
        Box::new(CenteringPhase) as Box<dyn PhaseProcessor>,
        Box::new(QuadIslandsPhase),
        Box::new(RandomIslandsPhase),
        Box::new(TransitPhase),
        Box::new(IslandShallowPhase),
        Box::new(DeepSeaPhase),
        Box::new(HarborPhase),
        Box::new(CliffsPhase),
        Box::new(LakesPhase),
        Box::new(EndPhase),
    ]);
    phases
}
