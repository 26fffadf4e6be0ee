//! Chromosomes: block grids of maze genes and their rendering.

use std::ops::RangeInclusive;

use image::{Rgb, RgbImage};

use crate::schema::GridConfig;

use super::maze::{Cell, Gene, Path};
use super::metrics::{self, Color, MetricsError, Palette, Region};
use super::rng::MazeRng;

/// Mapping from maze cells to image pixels.
///
/// Each cell owns a `stride_y × stride_x` pixel tile. Within a tile, paths
/// are drawn between offsets `stride / 4` and `stride / 2` on each axis, so
/// at stride 4 a cell occupies pixels `+1..=+2` and segments between
/// neighbours leave a one-pixel gap to adjacent paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLayout {
    grid: GridConfig,
    stride_y: usize,
    stride_x: usize,
}

impl RenderLayout {
    pub fn new(grid: GridConfig, stride_y: usize, stride_x: usize) -> Self {
        assert!(stride_y > 0 && stride_x > 0, "pixel stride must be positive");
        Self {
            grid,
            stride_y,
            stride_x,
        }
    }

    #[inline]
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    #[inline]
    pub fn stride_y(&self) -> usize {
        self.stride_y
    }

    #[inline]
    pub fn stride_x(&self) -> usize {
        self.stride_x
    }

    /// Rendered image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        (self.grid.cell_cols() * self.stride_x) as u32
    }

    /// Rendered image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        (self.grid.cell_rows() * self.stride_y) as u32
    }

    /// Pixel rectangle occupied by block `(by, bx)`.
    pub fn block_region(&self, by: usize, bx: usize) -> Region {
        let h = self.grid.block_height * self.stride_y;
        let w = self.grid.block_width * self.stride_x;
        Region::new((bx * w) as u32, (by * h) as u32, w as u32, h as u32)
    }

    /// Pixel span connecting cell coordinates `from` and `to` on one axis.
    #[inline]
    fn span(from: usize, to: usize, stride: usize) -> RangeInclusive<u32> {
        let a = from * stride + stride / 4;
        let b = to * stride + stride / 2;
        (a.min(b) as u32)..=(a.max(b) as u32)
    }

    fn rows(&self, from: Cell, to: Cell) -> RangeInclusive<u32> {
        Self::span(from.row, to.row, self.stride_y)
    }

    fn cols(&self, from: Cell, to: Cell) -> RangeInclusive<u32> {
        Self::span(from.col, to.col, self.stride_x)
    }
}

fn fill_rect(image: &mut RgbImage, rows: RangeInclusive<u32>, cols: RangeInclusive<u32>, color: Color) {
    debug_assert!(*rows.end() < image.height() && *cols.end() < image.width());
    for y in rows {
        for x in cols.clone() {
            image.put_pixel(x, y, color);
        }
    }
}

/// One candidate solution: a grid of genes plus its cached render and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    grid: GridConfig,
    /// Genes in row-major block order.
    genes: Vec<Gene>,
    image: Option<RgbImage>,
    fitness: Option<f64>,
}

impl Chromosome {
    /// Chromosome with every block randomly generated.
    pub fn random(grid: GridConfig, rng: &mut MazeRng, palette: Option<&Palette>) -> Self {
        let genes = (0..grid.block_count())
            .map(|_| Gene::random(grid.block_height, grid.block_width, rng, palette))
            .collect();
        Self {
            grid,
            genes,
            image: None,
            fitness: None,
        }
    }

    /// Deep copy of the genes without the cached image and score.
    pub fn detached(&self) -> Self {
        Self {
            grid: self.grid,
            genes: self.genes.clone(),
            image: None,
            fitness: None,
        }
    }

    #[inline]
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    #[inline]
    fn index(&self, by: usize, bx: usize) -> usize {
        assert!(
            by < self.grid.blocks_y && bx < self.grid.blocks_x,
            "block ({by}, {bx}) outside {}x{} grid",
            self.grid.blocks_y,
            self.grid.blocks_x
        );
        by * self.grid.blocks_x + bx
    }

    #[inline]
    pub fn gene(&self, by: usize, bx: usize) -> &Gene {
        &self.genes[self.index(by, bx)]
    }

    /// Genes in row-major block order.
    #[inline]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Install a gene at `(by, bx)`, invalidating the cached image and score.
    pub fn set_gene(&mut self, by: usize, bx: usize, gene: Gene) {
        debug_assert_eq!(
            (gene.height(), gene.width()),
            (self.grid.block_height, self.grid.block_width)
        );
        let index = self.index(by, bx);
        self.genes[index] = gene;
        self.image = None;
        self.fitness = None;
    }

    #[inline]
    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// All paths translated into global cell coordinates, in row-major
    /// block order.
    pub fn paths(&self) -> impl Iterator<Item = Path> + '_ {
        let grid = self.grid;
        self.genes.iter().enumerate().flat_map(move |(i, gene)| {
            let row_offset = (i / grid.blocks_x) * grid.block_height;
            let col_offset = (i % grid.blocks_x) * grid.block_width;
            gene.paths().iter().map(move |path| {
                let cells = path
                    .cells()
                    .iter()
                    .map(|c| c.offset(row_offset, col_offset))
                    .collect();
                Path::from_cells(cells, path.color())
            })
        })
    }

    /// Draw the chromosome onto a black canvas.
    ///
    /// Consecutive path cells are joined by a filled rectangle; each path's
    /// last cell gets its own square marker so single-cell paths stay
    /// visible.
    pub fn render(&self, layout: &RenderLayout) -> RgbImage {
        debug_assert_eq!(layout.grid(), &self.grid);
        let mut image = RgbImage::from_pixel(layout.width(), layout.height(), Rgb([0, 0, 0]));

        for path in self.paths() {
            let color = path.color();
            for pair in path.cells().windows(2) {
                let (from, to) = (pair[0], pair[1]);
                fill_rect(&mut image, layout.rows(from, to), layout.cols(from, to), color);
            }

            let head = path.head();
            fill_rect(&mut image, layout.rows(head, head), layout.cols(head, head), color);
        }

        image
    }

    /// Render, score against `reference`, and cache both.
    pub fn evaluate(
        &mut self,
        reference: &RgbImage,
        layout: &RenderLayout,
    ) -> Result<f64, MetricsError> {
        let image = self.render(layout);
        let fitness = metrics::deviation(reference, &image)?;
        self.image = Some(image);
        self.fitness = Some(fitness);
        Ok(fitness)
    }

    /// Produce `siblings` copies that share one freshly generated block.
    ///
    /// A single block position and a single new maze are drawn; each sibling
    /// receives that maze with independently resampled colours and is
    /// otherwise identical to `self`.
    pub fn mutate(
        &self,
        siblings: usize,
        rng: &mut MazeRng,
        palette: Option<&Palette>,
    ) -> Vec<Chromosome> {
        let by = rng.below(self.grid.blocks_y);
        let bx = rng.below(self.grid.blocks_x);
        let gene = Gene::random(self.grid.block_height, self.grid.block_width, rng, palette);

        (0..siblings)
            .map(|_| {
                let mut child = self.detached();
                child.set_gene(by, bx, gene.recolored(rng, palette));
                child
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(blocks: usize, cells: usize) -> GridConfig {
        GridConfig {
            blocks_y: blocks,
            blocks_x: blocks,
            block_height: cells,
            block_width: cells,
        }
    }

    fn differing_blocks(a: &Chromosome, b: &Chromosome) -> Vec<usize> {
        a.genes()
            .iter()
            .zip(b.genes())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_random_chromosome() {
        let mut rng = MazeRng::new(42);
        let chromosome = Chromosome::random(grid(3, 4), &mut rng, None);
        assert_eq!(chromosome.genes().len(), 9);
        assert!(chromosome.genes().iter().all(Gene::is_partition));
        assert!(chromosome.image().is_none());
        assert!(chromosome.fitness().is_none());
    }

    #[test]
    fn test_layout_regions() {
        let layout = RenderLayout::new(grid(2, 8), 4, 4);
        assert_eq!((layout.width(), layout.height()), (64, 64));
        assert_eq!(layout.block_region(1, 0), Region::new(0, 32, 32, 32));
        assert_eq!(layout.block_region(1, 1), Region::new(32, 32, 32, 32));
    }

    #[test]
    fn test_span_matches_stride_four_margins() {
        assert_eq!(RenderLayout::span(0, 1, 4), 1..=6);
        assert_eq!(RenderLayout::span(1, 0, 4), 2..=5);
        assert_eq!(RenderLayout::span(3, 3, 4), 13..=14);
        assert_eq!(RenderLayout::span(5, 5, 1), 5..=5);
    }

    #[test]
    fn test_paths_translated_to_global_cells() {
        let mut rng = MazeRng::new(8);
        let chromosome = Chromosome::random(grid(2, 3), &mut rng, None);
        let paths: Vec<Path> = chromosome.paths().collect();
        let total: usize = paths.iter().map(Path::len).sum();
        assert_eq!(total, 36);

        let last_block_paths = chromosome.gene(1, 1).paths().len();
        for path in &paths[paths.len() - last_block_paths..] {
            assert!(path.cells().iter().all(|c| c.row >= 3 && c.col >= 3));
        }
    }

    #[test]
    fn test_render_single_cell_path() {
        let g = grid(1, 1);
        let mut chromosome = Chromosome::random(g, &mut MazeRng::new(1), None);
        let mut gene = Gene::new(1, 1);
        gene.fill(&mut MazeRng::new(1));
        let palette = Palette::from_colors([Rgb([200, 100, 50])]);
        gene.color(&mut MazeRng::new(1), Some(&palette));
        chromosome.set_gene(0, 0, gene);

        let image = chromosome.render(&RenderLayout::new(g, 4, 4));
        assert_eq!(image.dimensions(), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (1..=2).contains(&x) && (1..=2).contains(&y) {
                    Rgb([200, 100, 50])
                } else {
                    Rgb([0, 0, 0])
                };
                assert_eq!(*image.get_pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_render_segment() {
        let g = GridConfig {
            blocks_y: 1,
            blocks_x: 1,
            block_height: 1,
            block_width: 2,
        };
        let mut chromosome = Chromosome::random(g, &mut MazeRng::new(0), None);
        let mut gene = Gene::new(1, 2);
        gene.fill(&mut MazeRng::new(0));
        let palette = Palette::from_colors([Rgb([255, 255, 255])]);
        gene.color(&mut MazeRng::new(0), Some(&palette));
        chromosome.set_gene(0, 0, gene);

        let image = chromosome.render(&RenderLayout::new(g, 4, 4));
        let lit = image.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        // A 1x2 block always yields one two-cell path. Walking right paints
        // x 1..=6; walking left paints x 2..=5 plus the marker at x 1..=2.
        assert!(lit == 12 || lit == 10, "lit = {lit}");
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(7, 3), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_evaluate_caches_image() {
        let g = grid(2, 2);
        let layout = RenderLayout::new(g, 2, 2);
        let reference = RgbImage::new(layout.width(), layout.height());
        let mut chromosome = Chromosome::random(g, &mut MazeRng::new(5), None);

        let fitness = chromosome.evaluate(&reference, &layout).unwrap();
        assert!(fitness >= 0.0 && fitness.is_finite());
        assert_eq!(chromosome.fitness(), Some(fitness));
        assert_eq!(chromosome.image(), Some(&chromosome.render(&layout)));

        let replacement = Gene::random(2, 2, &mut MazeRng::new(6), None);
        chromosome.set_gene(0, 1, replacement);
        assert!(chromosome.image().is_none());
        assert!(chromosome.fitness().is_none());
    }

    #[test]
    fn test_evaluate_size_mismatch() {
        let g = grid(2, 2);
        let layout = RenderLayout::new(g, 2, 2);
        let reference = RgbImage::new(3, 3);
        let mut chromosome = Chromosome::random(g, &mut MazeRng::new(5), None);
        assert!(matches!(
            chromosome.evaluate(&reference, &layout),
            Err(MetricsError::SizeMismatch(..))
        ));
    }

    #[test]
    fn test_mutation_touches_one_block() {
        let mut rng = MazeRng::new(21);
        let base = Chromosome::random(grid(4, 5), &mut rng, None);
        let siblings = base.mutate(6, &mut rng, None);
        assert_eq!(siblings.len(), 6);

        let mut changed = Vec::new();
        for sibling in &siblings {
            let diff = differing_blocks(&base, sibling);
            assert!(diff.len() <= 1);
            changed.extend(diff);
        }
        changed.dedup();
        assert!(changed.len() <= 1);
    }

    #[test]
    fn test_siblings_share_geometry() {
        let mut rng = MazeRng::new(2);
        let base = Chromosome::random(grid(1, 6), &mut rng, None);
        let siblings = base.mutate(3, &mut rng, None);

        let cells = |c: &Chromosome| -> Vec<Vec<Cell>> {
            c.gene(0, 0).paths().iter().map(|p| p.cells().to_vec()).collect()
        };
        assert_eq!(cells(&siblings[0]), cells(&siblings[1]));
        assert_eq!(cells(&siblings[1]), cells(&siblings[2]));
    }
}
