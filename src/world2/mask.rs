//! Influence mask for soil growth and the soil target draw.
//!
//! Each archetype produces a value in [0, 1] per tile. Walkers prefer
//! high values and respawn when every direction scores too low.

use noise::{NoiseFn, Perlin, Seedable};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::{GeneratorConfig, MaskShape};
use crate::tilemap::Tilemap;

const FRACTAL_OCTAVES: u32 = 5;
const FRACTAL_FREQUENCY: f64 = 4.0;
/// Noise level below which the fractal mask is empty
const FRACTAL_THRESHOLD: f64 = 0.45;

/// Build the mask for a shape. Only the archipelago and fractal shapes
/// consume randomness.
pub fn generate_mask(shape: MaskShape, width: usize, height: usize, rng: &mut ChaCha8Rng) -> Tilemap<f64> {
    let mut mask = Tilemap::new_with(width, height, 0.0f64);
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let max_r = cx.min(cy);
    let w = width as f64;
    let h = height as f64;

    let fractal = match shape {
        MaskShape::Fractal => Some(Perlin::new(1).set_seed(rng.gen::<u32>())),
        _ => None,
    };

    for y in 0..height {
        for x in 0..width {
            let fx = x as f64;
            let fy = y as f64;
            let dist = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();

            let value = match shape {
                MaskShape::Full => 1.0,
                MaskShape::CentralIsland => {
                    if x < (w * 0.1) as usize || x > (w * 0.9) as usize {
                        0.8
                    } else if dist < max_r * 0.4 {
                        1.0
                    } else {
                        0.0
                    }
                }
                MaskShape::WestContinent => flag(x < (w * 0.6) as usize),
                MaskShape::EastContinent => flag(x > (w * 0.4) as usize),
                MaskShape::PartialContinent => flag(y < (h * 0.5) as usize),
                MaskShape::Annulus => {
                    if dist < max_r * 0.2 {
                        1.0
                    } else if dist > max_r * 0.4 && dist < max_r * 0.7 {
                        0.8
                    } else {
                        0.0
                    }
                }
                MaskShape::Archipelago => flag(rng.gen::<f64>() > 0.85),
                MaskShape::Crescent => {
                    let (ix, iy) = (cx as usize, cy as usize);
                    let inside = dist < max_r * 0.7;
                    flag(inside && ((x < ix && y < iy) || (x > ix && y > iy)))
                }
                MaskShape::Fractal => match &fractal {
                    Some(noise) => {
                        let n = fbm(noise, fx / w * FRACTAL_FREQUENCY, fy / h * FRACTAL_FREQUENCY);
                        let v = n * 0.5 + 0.5;
                        ((v - FRACTAL_THRESHOLD) / (1.0 - FRACTAL_THRESHOLD)).clamp(0.0, 1.0)
                    }
                    None => 0.0,
                },
            };
            mask.set(x, y, value);
        }
    }
    mask
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn fbm(noise: &Perlin, x: f64, y: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..FRACTAL_OCTAVES {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_value
}

/// Draw the coverage percent uniformly from the configured range and turn
/// it into a tile count. Returns `(percent, target_soil_count)`.
pub fn draw_soil_target(config: &GeneratorConfig, rng: &mut ChaCha8Rng) -> (u32, usize) {
    let (lo, hi) = config.soil_pct_range();
    let pct = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    let total = (config.width * config.height) as f64;
    let count = (total * pct as f64 / 100.0).round() as usize;
    (pct, count)
}
