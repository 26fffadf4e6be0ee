//! Generation recorder for persisting per-generation images and statistics.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::schema::GenerationReport;

/// Configuration for generation recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Save the image of every Nth generation (1 = every generation).
    /// Statistics are written for every generation regardless.
    pub image_every: usize,
    /// Encoding of saved images.
    pub format: ImageFormat,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            image_every: 1,
            format: ImageFormat::Png,
        }
    }
}

/// Recorder errors.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Writes generation images to `<root>/<name>/generation_<n>.<ext>` and
/// statistics lines to `<root>/<name>_statistics.txt`.
///
/// Usage:
/// ```ignore
/// let mut recorder = GenerationRecorder::new("output", "image", Default::default())?;
/// engine.run_with_callback(|report, chromosome| {
///     recorder.record(report, chromosome.image().unwrap()).unwrap();
/// })?;
/// ```
pub struct GenerationRecorder {
    image_dir: PathBuf,
    stats: BufWriter<File>,
    stats_path: PathBuf,
    config: RecorderConfig,
    images_written: usize,
}

impl GenerationRecorder {
    /// Create the output directories and the statistics file.
    pub fn new<P: AsRef<Path>>(root: P, name: &str, config: RecorderConfig) -> io::Result<Self> {
        let root = root.as_ref();
        let image_dir = root.join(name);
        fs::create_dir_all(&image_dir)?;

        let stats_path = root.join(format!("{name}_statistics.txt"));
        let stats = BufWriter::new(File::create(&stats_path)?);

        Ok(Self {
            image_dir,
            stats,
            stats_path,
            config,
            images_written: 0,
        })
    }

    /// Directory holding generation images.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    pub fn images_written(&self) -> usize {
        self.images_written
    }

    /// Path of the image for `generation`.
    pub fn image_path(&self, generation: usize) -> PathBuf {
        let extension = self.config.format.extensions_str().first().copied().unwrap_or("png");
        self.image_dir.join(format!("generation_{generation}.{extension}"))
    }

    /// Persist one finalized generation.
    pub fn record(&mut self, report: &GenerationReport, image: &RgbImage) -> Result<(), RecorderError> {
        if report.generation % self.config.image_every.max(1) == 0 {
            image.save_with_format(self.image_path(report.generation), self.config.format)?;
            self.images_written += 1;
        }

        writeln!(self.stats, "{}", format_report(report))?;
        self.stats.flush()?;
        Ok(())
    }
}

/// Statistics line for one generation.
pub fn format_report(report: &GenerationReport) -> String {
    format!(
        "Generation: {}; Difference: {}; Time: {};",
        report.generation,
        report.fitness,
        report.elapsed_nanos()
    )
}
