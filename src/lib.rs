//! Island map generation library
//!
//! Re-exports modules for use by the binary and tools.

pub mod ascii;
pub mod config;
pub mod export;
pub mod tilemap;
pub mod world2;

pub use config::{ConfigError, GeneratorConfig, MaskShape};
pub use world2::Generator;
