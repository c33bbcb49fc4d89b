//! Phase-driven island map generator.
//!
//! A fixed table of phases turns an empty grid into an island map: ocean
//! and border, mask-guided soil growth with a tectonic shift, centering,
//! large and single-tile islands, stepping-stone routes, deep sea,
//! harbor sites, carved cliffs and shallows, and finally lakes. Each
//! phase's result is snapshotted so the run can be stepped back and forth.

pub mod centering;
pub mod cliffs;
pub mod deep_sea;
pub mod harbor;
pub mod island;
pub mod island_shallows;
pub mod islands;
pub mod lakes;
pub mod layers;
pub mod machine;
pub mod mask;
pub mod overlay;
pub mod phase;
pub mod phases;
pub mod soil;
pub mod state;
pub mod stats;
pub mod tile;
pub mod transit;

pub use machine::Generator;
pub use phase::PhaseProcessor;
pub use state::World;
pub use stats::TileStats;
pub use tile::{Grid, Tile, TileSource, TileType};
