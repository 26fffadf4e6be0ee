//! Pixel-level comparison and colour palette primitives.
//!
//! Deviation is the root-mean-square of the per-pixel summed squared RGB
//! channel differences:
//!
//! ```text
//! RMSD(A, B, R) = sqrt( Σ_{p ∈ R} Σ_{c ∈ {r,g,b}} (A[p].c - B[p].c)^2 / |R| )
//! ```

use std::collections::BTreeSet;

use image::{Rgb, RgbImage};

/// 24-bit RGB colour used for paths and rasters.
pub type Color = Rgb<u8>;

/// Axis-aligned pixel rectangle, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole image.
    pub fn full(image: &RgbImage) -> Self {
        Self::new(0, 0, image.width(), image.height())
    }

    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    fn fits(&self, image: &RgbImage) -> bool {
        self.x as u64 + self.width as u64 <= image.width() as u64
            && self.y as u64 + self.height as u64 <= image.height() as u64
    }
}

/// Pixel comparison errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Image sizes differ: {0:?} vs {1:?}")]
    SizeMismatch((u32, u32), (u32, u32)),
    #[error("Region {region:?} lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
    #[error("Region {0:?} contains no pixels")]
    EmptyRegion(Region),
}

/// Root-mean-square deviation over the whole image.
pub fn deviation(a: &RgbImage, b: &RgbImage) -> Result<f64, MetricsError> {
    region_deviation(a, b, Region::full(a))
}

/// Root-mean-square deviation restricted to `region`.
pub fn region_deviation(a: &RgbImage, b: &RgbImage, region: Region) -> Result<f64, MetricsError> {
    if a.dimensions() != b.dimensions() {
        return Err(MetricsError::SizeMismatch(a.dimensions(), b.dimensions()));
    }
    if !region.fits(a) {
        return Err(MetricsError::RegionOutOfBounds {
            region,
            width: a.width(),
            height: a.height(),
        });
    }
    if region.pixel_count() == 0 {
        return Err(MetricsError::EmptyRegion(region));
    }

    let mut sum = 0u64;
    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            sum += squared_distance(a.get_pixel(x, y), b.get_pixel(x, y));
        }
    }

    Ok((sum as f64 / region.pixel_count() as f64).sqrt())
}

/// Summed squared channel difference of two pixels.
#[inline]
fn squared_distance(p: &Color, q: &Color) -> u64 {
    p.0.iter()
        .zip(q.0.iter())
        .map(|(&a, &b)| {
            let d = a as i32 - b as i32;
            (d * d) as u64
        })
        .sum()
}

/// Distinct colours of a source image.
///
/// Colours are stored sorted so that index-based sampling is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Collect every exact RGB value present in `image`.
    pub fn from_image(image: &RgbImage) -> Self {
        let distinct: BTreeSet<[u8; 3]> = image.pixels().map(|p| p.0).collect();
        Self {
            colors: distinct.into_iter().map(Rgb).collect(),
        }
    }

    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.contains(color)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}
