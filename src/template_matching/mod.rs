/// Template matching module for finding reference screens in screenshots
///
/// - Resolution normalization of captured screens
/// - Zero-mean normalized cross-correlation score surfaces
/// - Best-template selection with a strict, floor-at-zero comparison
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod selector;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{MatchError, MatchResult};
pub use matcher::TemplateMatcher;
pub use normalizer::normalize_image;
pub use selector::{MatchSelector, select_best};
pub use types::{Resolution, ScoreMap, ScoreSurface, TemplateScore, template_name};
