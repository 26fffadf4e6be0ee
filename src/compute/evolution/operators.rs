//! Generational operators: population, evaluation, selection, crossover.
//!
//! Evaluation and best-block crossover fan out over rayon. Neither draws
//! random numbers, so results are identical for any thread count.

use image::RgbImage;
use rayon::prelude::*;

use crate::compute::{Chromosome, MazeRng, MetricsError, Palette, RenderLayout, metrics};
use crate::schema::PopulationConfig;

use super::EvolutionError;

/// Unmutated copy of `base` followed by `mutations × siblings` mutants.
pub fn populate(
    base: &Chromosome,
    config: &PopulationConfig,
    rng: &mut MazeRng,
    palette: Option<&Palette>,
) -> Vec<Chromosome> {
    let mut population = Vec::with_capacity(config.evaluated_per_generation());
    population.push(base.detached());

    for _ in 0..config.mutations {
        population.extend(base.mutate(config.siblings, rng, palette));
    }

    population
}

/// Render and score every member against `reference`.
pub fn evaluate(
    population: &mut [Chromosome],
    reference: &RgbImage,
    layout: &RenderLayout,
) -> Result<(), MetricsError> {
    population
        .par_iter_mut()
        .try_for_each(|chromosome| chromosome.evaluate(reference, layout).map(|_| ()))
}

/// Keep the `count` lowest-deviation members, best first.
///
/// The sort is stable, so equal scores keep their population order.
/// Unscored members rank last.
pub fn select(
    mut population: Vec<Chromosome>,
    count: usize,
) -> Result<Vec<Chromosome>, EvolutionError> {
    if count == 0 || count > population.len() {
        return Err(EvolutionError::InvalidSelection {
            survivors: count,
            population: population.len(),
        });
    }

    population.sort_by(|a, b| {
        let a = a.fitness().unwrap_or(f64::INFINITY);
        let b = b.fitness().unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    population.truncate(count);
    Ok(population)
}

/// Assemble a chromosome taking, per block, the survivor gene whose rendered
/// region deviates least from the reference.
///
/// Each chosen gene carries its regional deviation as its fitness. Ties go
/// to the higher-ranked survivor.
pub fn crossover_best(
    survivors: &[Chromosome],
    reference: &RgbImage,
    layout: &RenderLayout,
) -> Result<Chromosome, EvolutionError> {
    let first = survivors.first().ok_or(EvolutionError::NoSurvivors)?;
    let images = survivors
        .iter()
        .enumerate()
        .map(|(i, s)| s.image().ok_or(EvolutionError::NotEvaluated(i)))
        .collect::<Result<Vec<_>, _>>()?;

    let grid = *first.grid();
    let choices = (0..grid.block_count())
        .into_par_iter()
        .map(|block| -> Result<(usize, f64), MetricsError> {
            let region = layout.block_region(block / grid.blocks_x, block % grid.blocks_x);
            let mut best = (0, f64::INFINITY);
            for (i, image) in images.iter().enumerate() {
                let score = metrics::region_deviation(reference, image, region)?;
                if score < best.1 {
                    best = (i, score);
                }
            }
            Ok(best)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut child = first.detached();
    for (block, (winner, score)) in choices.into_iter().enumerate() {
        let (by, bx) = (block / grid.blocks_x, block % grid.blocks_x);
        let mut gene = survivors[winner].gene(by, bx).clone();
        gene.set_fitness(score);
        child.set_gene(by, bx, gene);
    }

    Ok(child)
}

/// Assemble a chromosome taking, per block, the gene of a random survivor.
pub fn crossover_random(
    survivors: &[Chromosome],
    rng: &mut MazeRng,
) -> Result<Chromosome, EvolutionError> {
    let first = survivors.first().ok_or(EvolutionError::NoSurvivors)?;
    let grid = *first.grid();

    let mut child = first.detached();
    for by in 0..grid.blocks_y {
        for bx in 0..grid.blocks_x {
            let winner = rng.below(survivors.len());
            let mut gene = survivors[winner].gene(by, bx).clone();
            gene.clear_fitness();
            child.set_gene(by, bx, gene);
        }
    }

    Ok(child)
}
