//! Template matching data types
use super::error::{MatchError, MatchResult};
use image::{ImageBuffer, Luma};
use imageproc::template_matching::find_extremes;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Correlation scores, one `f32` per candidate offset
pub type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether an image of this size fits inside `other` in both axes
    pub fn fits_within(&self, other: Resolution) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = MatchError;

    /// Parse `WIDTHxHEIGHT`, e.g. `2880x1800`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MatchError::InvalidResolution {
            input: s.to_string(),
        };
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Score surface produced by sliding one template over a target image.
///
/// Every cell `(x, y)` is the correlation coefficient of the template placed
/// with its top-left corner at `(x, y)` in the target.
#[derive(Debug, Clone)]
pub struct ScoreSurface {
    /// Where the surface was persisted
    pub path: PathBuf,
    pub scores: ScoreMap,
}

impl ScoreSurface {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.scores.width(), self.scores.height())
    }

    /// Highest score and its offset. First occurrence wins on ties.
    pub fn best(&self) -> (f32, (u32, u32)) {
        let extremes = find_extremes(&self.scores);
        (extremes.max_value, extremes.max_value_location)
    }

    /// Write scores as a 16-bit grayscale PNG, -1.0 => 0 and 1.0 => 65535
    pub fn save(&self) -> MatchResult<()> {
        let encoded: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(self.scores.width(), self.scores.height(), |x, y| {
                Luma([encode_score(self.scores.get_pixel(x, y)[0])])
            });
        encoded.save(&self.path).map_err(|source| MatchError::Encode {
            path: self.path.clone(),
            source,
        })
    }

    /// Read back a surface written by [`ScoreSurface::save`].
    ///
    /// Scores are quantized to 16 bits on disk, so values differ from the
    /// in-memory originals by at most ~1.5e-5.
    pub fn load(path: &Path) -> MatchResult<Self> {
        let encoded = image::open(path)
            .map_err(|source| MatchError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_luma16();
        let scores = ImageBuffer::from_fn(encoded.width(), encoded.height(), |x, y| {
            Luma([decode_score(encoded.get_pixel(x, y)[0])])
        });
        Ok(Self {
            path: path.to_path_buf(),
            scores,
        })
    }
}

fn encode_score(score: f32) -> u16 {
    let clamped = score.clamp(-1.0, 1.0);
    (((clamped + 1.0) / 2.0) * u16::MAX as f32).round() as u16
}

fn decode_score(value: u16) -> f32 {
    (value as f32 / u16::MAX as f32) * 2.0 - 1.0
}

/// Best score of one template against the current screen
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    pub template: PathBuf,
    /// Maximum correlation over the score surface
    pub score: f32,
    /// Offset of the best cell
    pub location: (u32, u32),
    pub surface_path: PathBuf,
}

impl TemplateScore {
    /// Template file stem, used as the key into action tables
    pub fn name(&self) -> &str {
        template_name(&self.template)
    }
}

/// File stem of a template path, `"unknown"` when it has none
pub fn template_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
}

impl fmt::Display for TemplateScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({},{}) - {:.4}",
            self.name(),
            self.location.0,
            self.location.1,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        let res: Resolution = "2880x1800".parse().unwrap();
        assert_eq!(res, Resolution::new(2880, 1800));
        assert_eq!(res.to_string(), "2880x1800");

        let upper: Resolution = " 1080X2280 ".parse().unwrap();
        assert_eq!(upper, Resolution::new(1080, 2280));
    }

    #[test]
    fn test_parse_resolution_rejects_garbage() {
        for input in ["", "2880", "2880x", "x1800", "0x1800", "2880x0", "axb", "-1x5"] {
            assert!(
                matches!(
                    input.parse::<Resolution>(),
                    Err(MatchError::InvalidResolution { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_fits_within() {
        let screen = Resolution::new(100, 50);
        assert!(Resolution::new(100, 50).fits_within(screen));
        assert!(Resolution::new(10, 10).fits_within(screen));
        assert!(!Resolution::new(101, 10).fits_within(screen));
        assert!(!Resolution::new(10, 51).fits_within(screen));
    }

    #[test]
    fn test_score_encoding_endpoints() {
        assert_eq!(encode_score(-1.0), 0);
        assert_eq!(encode_score(1.0), u16::MAX);
        assert_eq!(encode_score(5.0), u16::MAX);
        assert!((decode_score(encode_score(0.25)) - 0.25).abs() < 1e-4);
        assert!((decode_score(u16::MAX) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_best_prefers_first_on_ties() {
        let scores = ScoreMap::from_fn(3, 2, |x, y| {
            Luma([if (x, y) == (1, 0) || (x, y) == (2, 1) { 0.8 } else { 0.1 }])
        });
        let surface = ScoreSurface {
            path: PathBuf::from("unused.png"),
            scores,
        };
        let (best, location) = surface.best();
        assert_eq!(best, 0.8);
        assert_eq!(location, (1, 0));
    }

    #[test]
    fn test_template_name() {
        assert_eq!(template_name(Path::new("images/references/ref1.png")), "ref1");
        assert_eq!(template_name(Path::new("")), "unknown");
    }
}
