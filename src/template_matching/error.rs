use super::types::Resolution;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for image and matching operations.
pub type MatchResult<T> = Result<T, MatchError>;

/// The error type for image normalization and template matching.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Template {template:?} ({template_size}) is larger than the target ({target_size})")]
    TemplateLargerThanTarget {
        template: PathBuf,
        template_size: Resolution,
        target_size: Resolution,
    },

    #[error("Template {path:?} has no pixels")]
    EmptyTemplate { path: PathBuf },

    #[error("Invalid resolution '{input}', expected WIDTHxHEIGHT with non-zero sides")]
    InvalidResolution { input: String },
}
