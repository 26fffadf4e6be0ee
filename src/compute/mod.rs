//! Compute module - Maze generation, rendering and evolutionary search.

mod chromosome;
mod maze;
pub mod metrics;
mod rng;

pub mod evolution;

pub use chromosome::*;
pub use maze::*;
pub use metrics::{Color, MetricsError, Palette, Region};
pub use rng::*;
