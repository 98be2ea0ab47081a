//! Template matching implementation
//!
//! Zero-mean normalized cross-correlation between a template and every
//! same-sized window of a target image.
use super::error::{MatchError, MatchResult};
use super::types::{Resolution, ScoreMap, ScoreSurface, template_name};
use image::GrayImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Matches templates against a target image and persists the score surfaces
pub struct TemplateMatcher {
    output_dir: PathBuf,
}

impl TemplateMatcher {
    /// Create a matcher writing score surfaces into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Where the score surface for `template` is written
    pub fn surface_path(&self, template: &Path) -> PathBuf {
        self.output_dir
            .join(format!("{}_match_result.png", template_name(template)))
    }

    /// Correlate the template file against the target file.
    ///
    /// Both images are compared in grayscale. The resulting surface is saved
    /// to [`TemplateMatcher::surface_path`] before being returned.
    pub fn match_files(&self, template_path: &Path, target_path: &Path) -> MatchResult<ScoreSurface> {
        let template = load_gray(template_path)?;
        let target = load_gray(target_path)?;

        let scores = self.correlate(template_path, &template, &target)?;
        let surface = ScoreSurface {
            path: self.surface_path(template_path),
            scores,
        };

        std::fs::create_dir_all(&self.output_dir).map_err(|source| MatchError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;
        surface.save()?;
        log::debug!(
            "💾 Score surface {} for {} saved to {}",
            surface.resolution(),
            template_path.display(),
            surface.path.display()
        );

        Ok(surface)
    }

    /// Compute the score surface of `template` over `target`.
    ///
    /// The surface has `(target_w - template_w + 1, target_h - template_h + 1)`
    /// cells. A template larger than the target in either axis is rejected.
    pub fn correlate(
        &self,
        template_path: &Path,
        template: &GrayImage,
        target: &GrayImage,
    ) -> MatchResult<ScoreMap> {
        let template_size = Resolution::new(template.width(), template.height());
        let target_size = Resolution::new(target.width(), target.height());

        if template_size.width == 0 || template_size.height == 0 {
            return Err(MatchError::EmptyTemplate {
                path: template_path.to_path_buf(),
            });
        }
        if !template_size.fits_within(target_size) {
            return Err(MatchError::TemplateLargerThanTarget {
                template: template_path.to_path_buf(),
                template_size,
                target_size,
            });
        }

        Ok(correlation_coefficients(template, target))
    }
}

fn load_gray(path: &Path) -> MatchResult<GrayImage> {
    image::open(path)
        .map(|img| img.to_luma8())
        .map_err(|source| MatchError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Summed-area table over pixel values and squared pixel values.
///
/// Entry `(x, y)` holds the sum over all pixels strictly above and to the
/// left, so the table is one larger than the image in each axis.
struct WindowSums {
    stride: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl WindowSums {
    fn new(image: &GrayImage) -> Self {
        let stride = image.width() as usize + 1;
        let rows = image.height() as usize + 1;
        let mut sums = vec![0u64; stride * rows];
        let mut squares = vec![0u64; stride * rows];

        for y in 0..image.height() as usize {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for x in 0..image.width() as usize {
                let v = image.get_pixel(x as u32, y as u32)[0] as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sums[idx] = sums[idx - stride] + row_sum;
                squares[idx] = squares[idx - stride] + row_sq;
            }
        }

        Self {
            stride,
            sums,
            squares,
        }
    }

    /// (sum, sum of squares) over the `w`x`h` window at `(x, y)`
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (u64, u64) {
        let a = y * self.stride + x;
        let b = y * self.stride + x + w;
        let c = (y + h) * self.stride + x;
        let d = (y + h) * self.stride + x + w;
        (
            self.sums[d] + self.sums[a] - self.sums[b] - self.sums[c],
            self.squares[d] + self.squares[a] - self.squares[b] - self.squares[c],
        )
    }
}

/// Pixels per `u32` accumulation run, 65_536 · 255² < u32::MAX
const DOT_RUN: usize = 65_536;

/// Exact dot product of two equal-length pixel rows
fn dot(a: &[u8], b: &[u8]) -> u64 {
    a.chunks(DOT_RUN)
        .zip(b.chunks(DOT_RUN))
        .map(|(a, b)| {
            a.iter()
                .zip(b)
                .map(|(&t, &v)| t as u32 * v as u32)
                .sum::<u32>() as u64
        })
        .sum()
}

/// Zero-mean normalized cross-correlation of `template` over `target`.
///
/// Cells where the template or the window is flat (zero variance) score 0.
/// Callers must ensure the template fits inside the target. Output rows are
/// scored in parallel.
fn correlation_coefficients(template: &GrayImage, target: &GrayImage) -> ScoreMap {
    let (tw, th) = (template.width() as usize, template.height() as usize);
    let out_w = target.width() - template.width() + 1;
    let out_h = target.height() - template.height() + 1;
    let n = (tw * th) as f64;
    let n_int = (tw * th) as u128;

    let mut scores = ScoreMap::new(out_w, out_h);
    let template_raw = template.as_raw();
    let (template_sum, template_sq) = template_raw
        .iter()
        .fold((0u64, 0u64), |(s, q), &v| (s + v as u64, q + v as u64 * v as u64));
    let template_spread = n_int * template_sq as u128 - (template_sum as u128).pow(2);
    if template_spread == 0 {
        log::debug!("  ⚠️ Template has no contrast, every offset scores 0");
        return scores;
    }
    let template_mean = template_sum as f64 / n;
    let template_norm = (template_spread as f64 / n).sqrt();

    let start = std::time::Instant::now();
    let sums = WindowSums::new(target);
    let target_w = target.width() as usize;
    let target_raw = target.as_raw();

    let cells: &mut [f32] = &mut scores;
    cells
        .par_chunks_mut(out_w as usize)
        .enumerate()
        .for_each(|(oy, row_scores)| {
            for (ox, cell) in row_scores.iter_mut().enumerate() {
                let (sum, sum_sq) = sums.window(ox, oy, tw, th);
                // n * Σ(I - Ī)², exact in integers
                let spread = n_int * sum_sq as u128 - (sum as u128).pow(2);
                if spread == 0 {
                    continue;
                }
                let window_norm = (spread as f64 / n).sqrt();

                // Σ T·I, exact in integers
                let cross: u64 = (0..th)
                    .map(|ty| {
                        let row_start = (oy + ty) * target_w + ox;
                        dot(
                            &template_raw[ty * tw..(ty + 1) * tw],
                            &target_raw[row_start..row_start + tw],
                        )
                    })
                    .sum();
                // Σ (T - T̄)(I - Ī) == Σ T·I - T̄ · Σ I
                let numerator = cross as f64 - template_mean * sum as f64;

                *cell = (numerator / (template_norm * window_norm)).clamp(-1.0, 1.0) as f32;
            }
        });

    log::trace!(
        "  ⏱️ Correlated {}x{} template over {}x{} in {}ms",
        tw,
        th,
        target.width(),
        target.height(),
        start.elapsed().as_millis()
    );
    scores
}
