//! Maze Evo CLI - Approximate a reference image with evolved maze paths.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use maze_evo::{
    EvolutionConfig, EvolutionEngine,
    output::{GenerationRecorder, RecorderConfig},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <image> [config.json] [output-dir]", args[0]);
        eprintln!();
        eprintln!("Evolve a maze-path approximation of a reference image.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  image        Reference image (PNG or JPEG)");
        eprintln!("  config.json  Evolution configuration (default: built-in)");
        eprintln!("  output-dir   Directory for generation images (default: output)");
        eprintln!();
        eprintln!("Print the default configuration with --example.");
        std::process::exit(1);
    }

    let image_path = PathBuf::from(&args[1]);
    let output_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("output"));

    // Load configuration
    let config: EvolutionConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => EvolutionConfig::default(),
    };

    // Load reference image
    let reference = image::open(&image_path)
        .unwrap_or_else(|e| {
            eprintln!("Error reading image {}: {}", image_path.display(), e);
            std::process::exit(1);
        })
        .to_rgb8();

    println!("Maze Evolution");
    println!("==============");
    println!(
        "Reference: {} ({}x{})",
        image_path.display(),
        reference.width(),
        reference.height()
    );
    println!(
        "Grid: {}x{} blocks of {}x{} cells",
        config.grid.blocks_y, config.grid.blocks_x, config.grid.block_height, config.grid.block_width
    );
    println!(
        "Population: {} mutations x {} siblings, {} survivors",
        config.population.mutations, config.population.siblings, config.population.survivors
    );
    println!("Generations: {}", config.population.generations);
    println!();

    let mut engine = EvolutionEngine::new(config, reference).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let name = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let mut recorder = GenerationRecorder::new(&output_dir, name, RecorderConfig::default())
        .unwrap_or_else(|e| {
            eprintln!("Error creating output in {}: {}", output_dir.display(), e);
            std::process::exit(1);
        });

    let result = engine.run_with_callback(|report, chromosome| {
        println!(
            "Generation: {}; Difference: {:.4}; Time: {:.2}s;",
            report.generation, report.fitness, report.elapsed_seconds
        );
        if let Some(image) = chromosome.image()
            && let Err(e) = recorder.record(report, image)
        {
            log::error!("Failed to record generation {}: {}", report.generation, e);
        }
    });

    let result = result.unwrap_or_else(|e| {
        eprintln!("Evolution failed: {}", e);
        std::process::exit(1);
    });

    println!();
    println!("Finished after {} generations", result.stats.generations);
    println!("  Final deviation: {:.4}", result.stats.final_fitness);
    println!("  Best deviation:  {:.4}", result.stats.best_fitness);
    println!(
        "  Time: {:.2}s ({} evaluations)",
        result.stats.elapsed_seconds, result.stats.total_evaluations
    );
    println!("  Images: {}", recorder.image_dir().display());
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
