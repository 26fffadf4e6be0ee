//! Maze Evo - Evolutionary image approximation with self-avoiding maze paths.
//!
//! A candidate image is a grid of blocks, each block a small maze whose
//! cells are partitioned into coloured self-avoiding walks. A generational
//! search mutates one block at a time, scores candidates by RGB
//! root-mean-square deviation from a reference image, keeps the best, and
//! recombines them block by block.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration and per-generation report types
//! - `compute`: Pixel metrics, maze genes, chromosomes and the evolution engine
//! - `output`: Persistence of generation images and statistics
//!
//! # Example
//!
//! ```rust,no_run
//! use maze_evo::{EvolutionConfig, EvolutionEngine};
//!
//! let reference = image::open("image.jpg").unwrap().to_rgb8();
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, reference).unwrap();
//! let result = engine.run().unwrap();
//!
//! println!("Final deviation: {:.3}", result.stats.final_fitness);
//! result.last.image().unwrap().save("final.png").unwrap();
//! ```

pub mod compute;
pub mod output;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, EvolutionError, EvolutionResult};
pub use compute::{Chromosome, Gene, MazeRng, RenderLayout};
pub use schema::{EvolutionConfig, GenerationReport};
