//! Evolutionary search over maze chromosomes.
//!
//! # Overview
//!
//! Each generation runs four operators (`operators`):
//!
//! - **Populate**: the unmutated parent plus `mutations` groups of
//!   `siblings`, each group sharing one freshly generated block with
//!   independently recoloured paths
//! - **Evaluate**: render every member and score it against the reference
//! - **Select**: keep the `survivors` lowest-deviation members
//! - **Crossover**: per block, take the survivor gene that best matches the
//!   reference over that block's pixels
//!
//! The driver (`search`) repeats this for the configured number of
//! generations.
//!
//! # Example
//!
//! ```rust,no_run
//! use maze_evo::compute::evolution::EvolutionEngine;
//! use maze_evo::schema::EvolutionConfig;
//!
//! let reference = image::open("image.jpg").unwrap().to_rgb8();
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), reference).unwrap();
//! let result = engine
//!     .run_with_callback(|report, _| {
//!         println!("Generation {}: deviation {:.3}", report.generation, report.fitness);
//!     })
//!     .unwrap();
//! println!("Best deviation: {:.3}", result.stats.best_fitness);
//! ```

mod operators;
mod search;

pub use operators::{crossover_best, crossover_random, evaluate, populate, select};
pub use search::{EvolutionEngine, EvolutionResult};

use crate::compute::MetricsError;
use crate::schema::ConfigError;

/// Errors surfaced by the evolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Pixel comparison failed: {0}")]
    Metrics(#[from] MetricsError),
    #[error("Cannot keep {survivors} survivors from a population of {population}")]
    InvalidSelection { survivors: usize, population: usize },
    #[error("No survivors to recombine")]
    NoSurvivors,
    #[error("Survivor {0} has not been rendered")]
    NotEvaluated(usize),
}
