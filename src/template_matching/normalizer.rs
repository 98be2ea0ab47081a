//! Screen resolution normalization
//!
//! Screenshots are scaled to the resolution the reference templates were
//! captured at, so a single template set works across devices.

use super::error::{MatchError, MatchResult};
use super::types::Resolution;
use image::imageops::FilterType;
use std::path::Path;

/// Resize the image at `path` in place to exactly `target`.
///
/// An image already at `target` is left untouched on disk. Otherwise it is
/// scaled (not cropped) with linear interpolation and written back to the
/// same path, in the format implied by its extension.
pub fn normalize_image<'a>(path: &'a Path, target: Resolution) -> MatchResult<&'a Path> {
    let image = image::open(path).map_err(|source| MatchError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let current = Resolution::new(image.width(), image.height());
    if current == target {
        log::debug!("📐 {} already at {}", path.display(), target);
        return Ok(path);
    }

    log::info!("📐 Resizing {} from {} to {}", path.display(), current, target);
    let resized = image.resize_exact(target.width, target.height, FilterType::Triangle);
    resized.save(path).map_err(|source| MatchError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(path)
}
