//! Configuration types for maze evolution runs.

use serde::{Deserialize, Serialize};

use crate::compute::RenderLayout;

/// Top-level configuration for an evolution run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Block grid and per-block maze dimensions.
    #[serde(default)]
    pub grid: GridConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// How survivors are recombined into the next chromosome.
    #[serde(default)]
    pub crossover: CrossoverStrategy,
    /// Where path colours are drawn from.
    #[serde(default)]
    pub palette: PaletteMode,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Block grid layout of a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of block rows (Ny).
    pub blocks_y: usize,
    /// Number of block columns (Nx).
    pub blocks_x: usize,
    /// Cells per block vertically (H).
    pub block_height: usize,
    /// Cells per block horizontally (W).
    pub block_width: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            blocks_y: 16,
            blocks_x: 16,
            block_height: 8,
            block_width: 8,
        }
    }
}

impl GridConfig {
    /// Total maze rows across all blocks.
    #[inline]
    pub fn cell_rows(&self) -> usize {
        self.blocks_y * self.block_height
    }

    /// Total maze columns across all blocks.
    #[inline]
    pub fn cell_cols(&self) -> usize {
        self.blocks_x * self.block_width
    }

    /// Number of blocks in the grid.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks_y * self.blocks_x
    }
}

/// Population sizing for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Mutations per generation, each picking a fresh block.
    #[serde(default = "default_mutations")]
    pub mutations: usize,
    /// Recoloured siblings produced per mutation.
    #[serde(default = "default_siblings")]
    pub siblings: usize,
    /// Best members kept for crossover.
    #[serde(default = "default_survivors")]
    pub survivors: usize,
    /// Generations to run.
    #[serde(default = "default_generations")]
    pub generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            mutations: default_mutations(),
            siblings: default_siblings(),
            survivors: default_survivors(),
            generations: default_generations(),
        }
    }
}

impl PopulationConfig {
    /// Members evaluated per generation: the unmutated parent plus every sibling.
    #[inline]
    pub fn evaluated_per_generation(&self) -> usize {
        1 + self.mutations * self.siblings
    }
}

fn default_mutations() -> usize {
    250
}
fn default_siblings() -> usize {
    4
}
fn default_survivors() -> usize {
    100
}
fn default_generations() -> usize {
    500
}

/// Recombination of survivors into one chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossoverStrategy {
    /// Per block, take the survivor gene with the lowest regional deviation.
    #[default]
    BestBlock,
    /// Per block, take the gene of a uniformly random survivor.
    Random,
}

/// Colour source for path colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteMode {
    /// Sample from the exact colours present in the reference image.
    #[default]
    Reference,
    /// Sample uniform RGB triples.
    Uniform,
}

impl EvolutionConfig {
    /// Validate counts and grid dimensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.blocks_y == 0 || grid.blocks_x == 0 {
            return Err(ConfigError::InvalidGrid);
        }
        if grid.block_height == 0 || grid.block_width == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }

        let population = &self.population;
        if population.mutations == 0 {
            return Err(ConfigError::ZeroCount("mutations"));
        }
        if population.siblings == 0 {
            return Err(ConfigError::ZeroCount("siblings"));
        }
        if population.survivors == 0 {
            return Err(ConfigError::ZeroCount("survivors"));
        }
        if population.generations == 0 {
            return Err(ConfigError::ZeroCount("generations"));
        }

        let evaluated = population.evaluated_per_generation();
        if population.survivors > evaluated {
            return Err(ConfigError::TooManySurvivors {
                survivors: population.survivors,
                population: evaluated,
            });
        }

        Ok(())
    }

    /// Check a reference image against the grid and derive its render layout.
    pub fn validate_reference(&self, width: u32, height: u32) -> Result<RenderLayout, ConfigError> {
        let rows = self.grid.cell_rows();
        let cols = self.grid.cell_cols();
        let (w, h) = (width as usize, height as usize);

        if w == 0 || h == 0 || w % cols != 0 || h % rows != 0 {
            return Err(ConfigError::ReferenceMismatch {
                width,
                height,
                rows,
                cols,
            });
        }

        Ok(RenderLayout::new(self.grid, h / rows, w / cols))
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Block grid dimensions must be non-zero")]
    InvalidGrid,
    #[error("Block cell dimensions must be non-zero")]
    InvalidBlockSize,
    #[error("Population setting `{0}` must be positive")]
    ZeroCount(&'static str),
    #[error("Survivor count {survivors} exceeds population size {population}")]
    TooManySurvivors { survivors: usize, population: usize },
    #[error(
        "Reference image {width}x{height} is not a positive multiple of the {cols}x{rows} cell grid"
    )]
    ReferenceMismatch {
        width: u32,
        height: u32,
        rows: usize,
        cols: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.evaluated_per_generation(), 1001);
    }

    #[test]
    fn test_rejects_zero_counts() {
        let mut config = EvolutionConfig::default();
        config.population.siblings = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCount("siblings")));

        let mut config = EvolutionConfig::default();
        config.grid.block_width = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBlockSize));
    }

    #[test]
    fn test_rejects_too_many_survivors() {
        let mut config = EvolutionConfig::default();
        config.population = PopulationConfig {
            mutations: 2,
            siblings: 2,
            survivors: 6,
            generations: 1,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManySurvivors {
                survivors: 6,
                population: 5,
            })
        );

        config.population.survivors = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_layout() {
        let config = EvolutionConfig::default();
        let layout = config.validate_reference(512, 512).unwrap();
        assert_eq!(layout.stride_y(), 4);
        assert_eq!(layout.stride_x(), 4);

        assert!(matches!(
            config.validate_reference(500, 512),
            Err(ConfigError::ReferenceMismatch { .. })
        ));
        assert!(config.validate_reference(0, 0).is_err());
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig {
            crossover: CrossoverStrategy::Random,
            random_seed: Some(7),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.crossover, CrossoverStrategy::Random);
        assert_eq!(parsed.random_seed, Some(7));
        assert_eq!(parsed.grid, config.grid);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: EvolutionConfig =
            serde_json::from_str(r#"{ "population": { "siblings": 2 } }"#).unwrap();
        assert_eq!(parsed.population.siblings, 2);
        assert_eq!(parsed.population.mutations, 250);
        assert_eq!(parsed.grid, GridConfig::default());
        assert_eq!(parsed.palette, PaletteMode::Reference);
    }
}
