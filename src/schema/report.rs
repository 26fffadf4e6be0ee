//! Per-generation reports and run results.

use serde::{Deserialize, Serialize};

/// Statistics emitted after each finalized generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation index, starting at 1.
    pub generation: usize,
    /// Whole-image deviation of the finalized chromosome.
    pub fitness: f64,
    /// Wall-clock time since the run started.
    pub elapsed_seconds: f64,
}

impl GenerationReport {
    /// Elapsed time in whole nanoseconds.
    pub fn elapsed_nanos(&self) -> u128 {
        (self.elapsed_seconds * 1e9) as u128
    }
}

/// Fitness history for plotting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    /// Finalized fitness per generation.
    pub fitness: Vec<f64>,
    /// Best population fitness per generation, before crossover.
    pub population_best: Vec<f64>,
    /// Mean population fitness per generation.
    pub population_mean: Vec<f64>,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations completed.
    pub generations: usize,
    /// Chromosomes rendered and scored.
    pub total_evaluations: u64,
    /// Lowest finalized fitness seen.
    pub best_fitness: f64,
    /// Finalized fitness of the last generation.
    pub final_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Ran the configured number of generations.
    MaxGenerations,
    /// Cancelled through the engine's cancel handle.
    Cancelled,
}
