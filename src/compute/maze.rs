//! Maze blocks: grid cells, coloured paths and genes.
//!
//! A gene partitions its `height × width` cell grid into disjoint
//! self-avoiding walks. Walks are grown greedily from random unvisited
//! cells until they hit a dead end, so a block usually holds many short
//! paths rather than one long one.

use image::Rgb;

use super::metrics::{Color, Palette};
use super::rng::MazeRng;

/// A `(row, col)` coordinate in a maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 4-neighbourhood inside a `height × width` grid, in down, up, right,
    /// left order.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        let down = (self.row + 1 < height).then(|| Cell::new(self.row + 1, self.col));
        let up = self.row.checked_sub(1).map(|r| Cell::new(r, self.col));
        let right = (self.col + 1 < width).then(|| Cell::new(self.row, self.col + 1));
        let left = self.col.checked_sub(1).map(|c| Cell::new(self.row, c));
        [down, up, right, left].into_iter().flatten()
    }

    /// Manhattan distance.
    #[inline]
    pub fn distance(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Shift by a block offset.
    #[inline]
    pub fn offset(self, rows: usize, cols: usize) -> Cell {
        Cell::new(self.row + rows, self.col + cols)
    }
}

/// One coloured self-avoiding walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Cell>,
    color: Color,
}

impl Path {
    /// Single-cell path, black until coloured.
    pub fn new(start: Cell) -> Self {
        Self {
            cells: vec![start],
            color: Rgb([0, 0, 0]),
        }
    }

    /// Build from an existing walk. Consecutive cells must be 4-adjacent.
    pub fn from_cells(cells: Vec<Cell>, color: Color) -> Self {
        debug_assert!(!cells.is_empty());
        debug_assert!(cells.windows(2).all(|w| w[0].distance(w[1]) == 1));
        Self { cells, color }
    }

    #[inline]
    pub fn push(&mut self, cell: Cell) {
        debug_assert_eq!(self.head().distance(cell), 1);
        self.cells.push(cell);
    }

    /// Last cell of the walk.
    #[inline]
    pub fn head(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

/// Cells not yet claimed by a path, with O(1) removal.
struct Unvisited {
    cells: Vec<Cell>,
    /// Position of each cell (row-major) in `cells`, `None` once visited.
    slot: Vec<Option<usize>>,
    width: usize,
}

impl Unvisited {
    fn new(height: usize, width: usize) -> Self {
        let cells: Vec<Cell> = (0..height)
            .flat_map(|row| (0..width).map(move |col| Cell::new(row, col)))
            .collect();
        let slot = (0..cells.len()).map(Some).collect();
        Self { cells, slot, width }
    }

    #[inline]
    fn contains(&self, cell: Cell) -> bool {
        self.slot[cell.row * self.width + cell.col].is_some()
    }

    fn remove(&mut self, cell: Cell) {
        let key = cell.row * self.width + cell.col;
        if let Some(pos) = self.slot[key].take() {
            self.cells.swap_remove(pos);
            if let Some(moved) = self.cells.get(pos) {
                self.slot[moved.row * self.width + moved.col] = Some(pos);
            }
        }
    }
}

/// A maze block: a partition of its cells into coloured paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    height: usize,
    width: usize,
    paths: Vec<Path>,
    fitness: Option<f64>,
}

impl Gene {
    /// Empty block with no paths.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            paths: Vec::new(),
            fitness: None,
        }
    }

    /// Filled and coloured block.
    pub fn random(height: usize, width: usize, rng: &mut MazeRng, palette: Option<&Palette>) -> Self {
        let mut gene = Self::new(height, width);
        gene.fill(rng);
        gene.color(rng, palette);
        gene
    }

    /// Replace all paths with a fresh self-avoiding-walk partition.
    pub fn fill(&mut self, rng: &mut MazeRng) {
        let mut unvisited = Unvisited::new(self.height, self.width);
        self.paths.clear();
        self.fitness = None;

        while !unvisited.cells.is_empty() {
            let start = unvisited.cells[rng.below(unvisited.cells.len())];
            unvisited.remove(start);
            let mut path = Path::new(start);

            loop {
                let mut moves = [start; 4];
                let mut count = 0;
                for next in path.head().neighbors(self.height, self.width) {
                    if unvisited.contains(next) {
                        moves[count] = next;
                        count += 1;
                    }
                }
                if count == 0 {
                    break;
                }

                let next = moves[rng.below(count)];
                unvisited.remove(next);
                path.push(next);
            }

            self.paths.push(path);
        }
    }

    /// Give every path an independently sampled colour.
    pub fn color(&mut self, rng: &mut MazeRng, palette: Option<&Palette>) {
        for path in &mut self.paths {
            path.set_color(rng.sample_color(palette));
        }
        self.fitness = None;
    }

    /// Copy with the same geometry and freshly sampled colours.
    pub fn recolored(&self, rng: &mut MazeRng, palette: Option<&Palette>) -> Self {
        let mut gene = self.clone();
        gene.color(rng, palette);
        gene
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Regional deviation assigned during crossover.
    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    #[inline]
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    #[inline]
    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    /// Whether the paths cover every cell exactly once.
    pub fn is_partition(&self) -> bool {
        let mut seen = vec![false; self.height * self.width];
        let mut covered = 0;
        for cell in self.paths.iter().flat_map(|p| p.cells()) {
            if cell.row >= self.height || cell.col >= self.width {
                return false;
            }
            let key = cell.row * self.width + cell.col;
            if seen[key] {
                return false;
            }
            seen[key] = true;
            covered += 1;
        }
        covered == seen.len()
    }
}
