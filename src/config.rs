//! Pipeline configuration

use crate::template_matching::Resolution;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEVICE_ID: &str = "ea499ae7";
pub const DEFAULT_TEMPLATE_RESOLUTION: Resolution = Resolution::new(2880, 1800);
pub const DEFAULT_REFERENCES_DIR: &str = "images/references";
pub const DEFAULT_OUTPUT_DIR: &str = "images/tests";
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything one capture → match → dispatch run needs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Serial passed to `adb -s`
    pub device_id: String,
    pub adb_path: PathBuf,
    /// Templates in evaluation order. Earlier entries win ties.
    pub template_paths: Vec<PathBuf>,
    /// Resolution the templates were captured at; screens are scaled to it
    pub template_resolution: Resolution,
    /// Captured screens and score surfaces are written here
    pub output_dir: PathBuf,
    pub command_timeout: Duration,
    /// JSON template → action table
    pub action_table: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let references = Path::new(DEFAULT_REFERENCES_DIR);
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            adb_path: PathBuf::from("adb"),
            template_paths: vec![references.join("ref1.png"), references.join("ref2.png")],
            template_resolution: DEFAULT_TEMPLATE_RESOLUTION,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            action_table: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `ANDROID_SERIAL` and `ADB_PATH` when set
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(serial) = lookup("ANDROID_SERIAL").filter(|s| !s.trim().is_empty()) {
            self.device_id = serial.trim().to_string();
        }
        if let Some(adb) = lookup("ADB_PATH").filter(|s| !s.trim().is_empty()) {
            self.adb_path = PathBuf::from(adb.trim());
        }
        self
    }
}

/// All `*.png` files directly inside `dir`, sorted by file name
pub fn discover_templates(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut templates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect();
    templates.sort();
    Ok(templates)
}
