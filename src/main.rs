use std::process;

use clap::Parser;
use log::error;

use island_generator::ascii;
use island_generator::config::{GeneratorConfig, MaskShape};
use island_generator::export;
use island_generator::world2::phases::default_phases;
use island_generator::Generator;

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island maps phase by phase")]
struct Args {
    /// Width of the map in tiles (20-500)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles (20-500)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON generator config; command-line flags override its values
    #[arg(long)]
    config: Option<String>,

    /// Lower bound of the soil coverage percentage
    #[arg(long)]
    min_pct: Option<u32>,

    /// Upper bound of the soil coverage percentage
    #[arg(long)]
    max_pct: Option<u32>,

    /// Mask archetype (full, central_island, west_continent, ...)
    #[arg(long)]
    mask: Option<MaskShape>,

    /// Keep the landmass where it grew
    #[arg(long)]
    no_centering: bool,

    /// Stop after this phase instead of running to the end
    #[arg(long)]
    phase: Option<usize>,

    /// Print the map to stdout
    #[arg(long)]
    ascii: bool,

    /// Export the map and statistics to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export the map to a PNG
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per tile for PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// List the generation phases and exit
    #[arg(long)]
    list_phases: bool,
}

fn build_config(args: &Args) -> GeneratorConfig {
    let mut config = match &args.config {
        Some(path) => match GeneratorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(pct) = args.min_pct {
        config.min_pct = pct;
    }
    if let Some(pct) = args.max_pct {
        config.max_pct = pct;
    }
    if let Some(mask) = args.mask {
        config.mask_shape = mask;
    }
    if args.no_centering {
        config.centering = false;
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_phases {
        for (i, phase) in default_phases().iter().enumerate() {
            println!("{:>2}. {}", i, phase.name());
        }
        return;
    }

    let config = build_config(&args);
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("Generating island map with seed: {}", seed);
    println!("Map size: {}x{}", config.width, config.height);

    let mut generator = match Generator::new(config, seed) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    match args.phase {
        Some(phase) => generator.run_to(phase),
        None => generator.run_to_end(),
    }

    println!("Phase: {}", generator.phase_label());
    for line in generator.summary_lines() {
        println!("{}", line);
    }

    if args.ascii {
        println!();
        ascii::print_ascii_map(&generator);
    }

    if let Some(path) = &args.export_ascii {
        match ascii::export_map_file(&generator, path) {
            Ok(()) => println!("Exported map to {}", path),
            Err(e) => error!("failed to export {}: {}", path, e),
        }
    }

    if let Some(path) = &args.export_png {
        match export::export_map_png(generator.grid(), Some(generator.overlay()), args.png_scale, path) {
            Ok(()) => println!("Exported PNG to {}", path),
            Err(e) => error!("failed to export {}: {}", path, e),
        }
    }
}
