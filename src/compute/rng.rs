//! Random source for maze generation and evolution.
//!
//! Every randomized decision draws from one `MazeRng` in a fixed call order,
//! so a seeded run replays exactly.

use image::Rgb;
use rand::prelude::*;

use super::metrics::{Color, Palette};

/// Random number generator wrapper for maze and evolution operations.
#[derive(Debug, Clone)]
pub struct MazeRng {
    rng: StdRng,
}

impl MazeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform integer in `[min, max)`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..max)
    }

    /// Uniform index in `[0, n)`. `n` must be positive.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Draw a colour from `palette` when one is given and non-empty,
    /// otherwise a uniform RGB triple.
    pub fn sample_color(&mut self, palette: Option<&Palette>) -> Color {
        match palette {
            Some(palette) if !palette.is_empty() => {
                let index = self.below(palette.len());
                palette.colors()[index]
            }
            _ => Rgb([self.rng.r#gen(), self.rng.r#gen(), self.rng.r#gen()]),
        }
    }
}
