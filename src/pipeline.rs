//! Capture → normalize → match → dispatch, as one linear pass

use crate::actions::{ActionDispatcher, ActionTable, DispatchOutcome, TableDispatcher};
use crate::adb::AdbShell;
use crate::config::PipelineConfig;
use crate::error::AutomationError;
use crate::template_matching::{MatchSelector, TemplateMatcher, TemplateScore, select_best};
use std::path::{Path, PathBuf};

/// Result of one pipeline pass
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub screen_path: PathBuf,
    /// Every template's best score, in evaluation order
    pub scores: Vec<TemplateScore>,
    pub best_match: Option<TemplateScore>,
    /// `None` when nothing matched and no dispatch was attempted
    pub dispatch: Option<DispatchOutcome>,
}

fn selector(config: &PipelineConfig) -> MatchSelector {
    MatchSelector::new(
        TemplateMatcher::new(&config.output_dir),
        config.template_resolution,
    )
}

fn ensure_templates(config: &PipelineConfig) -> Result<(), AutomationError> {
    if config.template_paths.is_empty() {
        return Err(AutomationError::Config(
            "no template images configured".to_string(),
        ));
    }
    Ok(())
}

/// Capture the configured device's screen into the output directory
pub async fn capture(config: &PipelineConfig) -> Result<PathBuf, AutomationError> {
    let shell = AdbShell::new(
        &config.adb_path,
        &config.device_id,
        config.command_timeout,
    );
    Ok(shell.capture_screen(&config.output_dir).await?)
}

/// Score every template against an existing screenshot and pick the best.
///
/// The screenshot is resized in place to the template resolution.
pub fn match_screen(
    config: &PipelineConfig,
    screen_path: &Path,
) -> Result<(Vec<TemplateScore>, Option<TemplateScore>), AutomationError> {
    ensure_templates(config)?;
    let scores = selector(config).evaluate_templates(screen_path, &config.template_paths)?;
    let best = select_best(scores.iter().cloned());
    match &best {
        Some(best) => log::info!("🎯 Best match: {best}"),
        None => log::info!("🤷 No template matched {}", screen_path.display()),
    }
    Ok((scores, best))
}

/// Dispatcher executing the configured action table, or an empty table
pub fn table_dispatcher(config: &PipelineConfig) -> Result<TableDispatcher, AutomationError> {
    let table = match &config.action_table {
        Some(path) => ActionTable::load(path)?,
        None => ActionTable::new(),
    };
    Ok(TableDispatcher::new(
        table,
        &config.adb_path,
        config.command_timeout,
    ))
}

/// Full pass: capture the screen, find the best template, dispatch its action
pub async fn run<D: ActionDispatcher>(
    config: &PipelineConfig,
    dispatcher: &D,
) -> Result<PipelineReport, AutomationError> {
    ensure_templates(config)?;
    log::info!("🚀 Running pipeline for device {}", config.device_id);

    let screen_path = capture(config).await?;
    let (scores, best_match) = match_screen(config, &screen_path)?;

    let dispatch = match &best_match {
        Some(best) => Some(
            dispatcher
                .dispatch(&best.template, &config.device_id)
                .await?,
        ),
        None => None,
    };

    Ok(PipelineReport {
        screen_path,
        scores,
        best_match,
        dispatch,
    })
}
