//! Generational search driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use image::RgbImage;

use crate::compute::{Chromosome, MazeRng, Palette, RenderLayout};
use crate::schema::{
    CrossoverStrategy, EvolutionConfig, EvolutionHistory, EvolutionStats, GenerationReport,
    PaletteMode, StopReason,
};

use super::EvolutionError;
use super::operators;

/// Final result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Chromosome of the last completed generation.
    pub last: Chromosome,
    /// Lowest-deviation chromosome seen, including the initial one.
    pub best: Chromosome,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Evolution engine that runs the search against one reference image.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    reference: RgbImage,
    layout: RenderLayout,
    palette: Option<Palette>,
    rng: MazeRng,
    current: Chromosome,
    best: Chromosome,
    generation: usize,
    history: EvolutionHistory,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    /// Validate the configuration against `reference` and build a random,
    /// already scored starting chromosome.
    pub fn new(config: EvolutionConfig, reference: RgbImage) -> Result<Self, EvolutionError> {
        config.validate()?;
        let layout = config.validate_reference(reference.width(), reference.height())?;

        let mut rng = config.random_seed.map_or_else(MazeRng::random, MazeRng::new);
        let palette = match config.palette {
            PaletteMode::Reference => Some(Palette::from_image(&reference)),
            PaletteMode::Uniform => None,
        };
        if let Some(palette) = &palette {
            log::debug!("reference palette holds {} colours", palette.len());
        }

        let mut current = Chromosome::random(config.grid, &mut rng, palette.as_ref());
        let fitness = current.evaluate(&reference, &layout)?;
        log::debug!("initial chromosome deviation {fitness:.4}");

        Ok(Self {
            best: current.clone(),
            config,
            reference,
            layout,
            palette,
            rng,
            current,
            generation: 0,
            history: EvolutionHistory::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    #[inline]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &RenderLayout {
        &self.layout
    }

    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Chromosome of the latest generation.
    #[inline]
    pub fn current(&self) -> &Chromosome {
        &self.current
    }

    /// Generations completed so far.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Run one populate → evaluate → select → crossover cycle and return the
    /// new chromosome's deviation.
    pub fn step(&mut self) -> Result<f64, EvolutionError> {
        let population_config = self.config.population;

        let mut population = operators::populate(
            &self.current,
            &population_config,
            &mut self.rng,
            self.palette.as_ref(),
        );
        operators::evaluate(&mut population, &self.reference, &self.layout)?;

        let scores: Vec<f64> = population.iter().filter_map(Chromosome::fitness).collect();
        let population_best = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let population_mean = scores.iter().sum::<f64>() / scores.len() as f64;
        log::debug!(
            "generation {}: {} members, best {population_best:.4}, mean {population_mean:.4}",
            self.generation + 1,
            population.len()
        );

        let survivors = operators::select(population, population_config.survivors)?;

        let mut child = match self.config.crossover {
            CrossoverStrategy::BestBlock => {
                operators::crossover_best(&survivors, &self.reference, &self.layout)?
            }
            CrossoverStrategy::Random => operators::crossover_random(&survivors, &mut self.rng)?,
        };
        let fitness = child.evaluate(&self.reference, &self.layout)?;

        if self.best.fitness().is_none_or(|best| fitness < best) {
            self.best = child.clone();
        }
        self.current = child;
        self.generation += 1;

        self.history.fitness.push(fitness);
        self.history.population_best.push(population_best);
        self.history.population_mean.push(population_mean);

        Ok(fitness)
    }

    /// Check if evolution should stop.
    fn should_stop(&self) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }
        if self.generation >= self.config.population.generations {
            return Some(StopReason::MaxGenerations);
        }
        None
    }

    /// Run all configured generations, invoking `callback` after each one
    /// with its report and finalized chromosome.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&GenerationReport, &Chromosome),
    {
        let start_time = Instant::now();
        let start_generation = self.generation;

        let stop_reason = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }

            let fitness = self.step()?;
            let report = GenerationReport {
                generation: self.generation,
                fitness,
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            };
            log::info!(
                "Generation: {}; Difference: {:.4}; Time: {:.2}s",
                report.generation,
                report.fitness,
                report.elapsed_seconds
            );
            callback(&report, &self.current);
        };

        let generations = self.generation - start_generation;
        let per_generation = self.config.population.evaluated_per_generation() as u64 + 1;

        Ok(EvolutionResult {
            last: self.current.clone(),
            best: self.best.clone(),
            stats: EvolutionStats {
                generations,
                total_evaluations: generations as u64 * per_generation,
                best_fitness: self.best.fitness().unwrap_or(f64::INFINITY),
                final_fitness: self.current.fitness().unwrap_or(f64::INFINITY),
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
                stop_reason,
            },
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_, _| {})
    }
}
