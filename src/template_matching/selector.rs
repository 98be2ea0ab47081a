//! Best-template selection over a screenshot

use super::error::MatchResult;
use super::matcher::TemplateMatcher;
use super::normalizer::normalize_image;
use super::types::{Resolution, TemplateScore};
use std::path::{Path, PathBuf};

/// Picks the template that best matches the current screen
pub struct MatchSelector {
    matcher: TemplateMatcher,
    template_resolution: Resolution,
}

impl MatchSelector {
    pub fn new(matcher: TemplateMatcher, template_resolution: Resolution) -> Self {
        Self {
            matcher,
            template_resolution,
        }
    }

    /// Normalize the screen once, then score every template in order.
    ///
    /// Any decode or dimension error aborts the whole evaluation.
    pub fn evaluate_templates(
        &self,
        screen_path: &Path,
        template_paths: &[PathBuf],
    ) -> MatchResult<Vec<TemplateScore>> {
        let screen = normalize_image(screen_path, self.template_resolution)?;

        let mut scores = Vec::with_capacity(template_paths.len());
        for (i, template_path) in template_paths.iter().enumerate() {
            log::debug!(
                "🔍 Processing template {}/{}: {}",
                i + 1,
                template_paths.len(),
                template_path.display()
            );
            let surface = self.matcher.match_files(template_path, screen)?;
            let (score, location) = surface.best();
            let entry = TemplateScore {
                template: template_path.clone(),
                score,
                location,
                surface_path: surface.path,
            };
            log::debug!("  📊 {entry}");
            scores.push(entry);
        }

        Ok(scores)
    }

    /// Best-matching template for the screen, `None` if nothing scores above 0
    pub fn find_match(
        &self,
        screen_path: &Path,
        template_paths: &[PathBuf],
    ) -> MatchResult<Option<TemplateScore>> {
        let scores = self.evaluate_templates(screen_path, template_paths)?;
        Ok(select_best(scores))
    }
}

/// Keep the strictly highest score, starting from a floor of 0.
///
/// The first template wins an exact tie. When no score exceeds 0 the result is
/// `None`, even if some scores are less negative than others.
pub fn select_best(scores: impl IntoIterator<Item = TemplateScore>) -> Option<TemplateScore> {
    let mut best_score = 0.0f32;
    let mut best = None;
    for candidate in scores {
        if candidate.score > best_score {
            best_score = candidate.score;
            best = Some(candidate);
        }
    }
    best
}
