use crate::actions::ActionError;
use crate::adb::AdbError;
use crate::template_matching::MatchError;
use thiserror::Error;

/// Top-level error for a pipeline run.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Screen capture failed: {0}")]
    Adb(#[from] AdbError),

    #[error("Template matching failed: {0}")]
    Match(#[from] MatchError),

    #[error("Action dispatch failed: {0}")]
    Action(#[from] ActionError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
