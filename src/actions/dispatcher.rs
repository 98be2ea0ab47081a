use super::error::ActionError;
use super::table::{ActionTable, DeviceAction};
use crate::adb::AdbShell;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a dispatcher did with a matched template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed(DeviceAction),
    /// No action is configured for the template
    Unmapped,
}

/// Maps a matched template to a device-side effect
#[allow(async_fn_in_trait)]
pub trait ActionDispatcher {
    async fn dispatch(&self, template: &Path, device_id: &str) -> Result<DispatchOutcome, ActionError>;
}

/// Executes actions from an [`ActionTable`] through `adb shell input`
pub struct TableDispatcher {
    table: ActionTable,
    adb_tool: PathBuf,
    timeout: Duration,
}

impl TableDispatcher {
    pub fn new(table: ActionTable, adb_tool: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            table,
            adb_tool: adb_tool.into(),
            timeout,
        }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }
}

impl ActionDispatcher for TableDispatcher {
    async fn dispatch(&self, template: &Path, device_id: &str) -> Result<DispatchOutcome, ActionError> {
        let Some(action) = self.table.action_for(template) else {
            log::warn!("⚠️ No action configured for {}", template.display());
            return Ok(DispatchOutcome::Unmapped);
        };

        log::info!("👆 {} on {} for {}", action, device_id, template.display());
        let shell = AdbShell::new(&self.adb_tool, device_id, self.timeout);
        match action {
            DeviceAction::Tap { x, y } => shell.tap(*x, *y).await?,
            DeviceAction::Swipe {
                x1,
                y1,
                x2,
                y2,
                duration_ms,
            } => shell.swipe(*x1, *y1, *x2, *y2, *duration_ms).await?,
            DeviceAction::KeyEvent { code } => shell.key_event(*code).await?,
            DeviceAction::Text { text } => shell.input_text(text).await?,
        }

        Ok(DispatchOutcome::Executed(action.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[tokio::test]
    async fn test_unmapped_template_is_not_an_error() {
        let dir = scratch_dir("dispatch_unmapped");
        // Tool is never invoked for unmapped templates
        let dispatcher = TableDispatcher::new(
            ActionTable::new(),
            dir.join("no-such-adb"),
            Duration::from_secs(1),
        );

        let outcome = dispatcher
            .dispatch(Path::new("images/references/ref1.png"), "dev1")
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Unmapped);
    }

    #[tokio::test]
    async fn test_adb_failure_propagates() {
        let dir = scratch_dir("dispatch_adb_missing");
        let mut table = ActionTable::new();
        table.insert("ref1", DeviceAction::Tap { x: 5, y: 5 });
        let dispatcher = TableDispatcher::new(table, dir.join("no-such-adb"), Duration::from_secs(1));

        let err = dispatcher
            .dispatch(Path::new("ref1.png"), "dev1")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Adb { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mapped_actions_run_on_device() {
        use crate::test_support::{fake_adb, fake_adb_calls};

        let dir = scratch_dir("dispatch_mapped");
        let tool = fake_adb(&dir, "exit 0");
        let mut table = ActionTable::new();
        table.insert("ref1", DeviceAction::Tap { x: 1440, y: 900 });
        table.insert("ref2", DeviceAction::KeyEvent { code: 4 });
        let dispatcher = TableDispatcher::new(table, &tool, Duration::from_secs(10));

        let first = dispatcher
            .dispatch(Path::new("images/references/ref1.png"), "ea499ae7")
            .await
            .unwrap();
        let second = dispatcher
            .dispatch(Path::new("images/references/ref2.png"), "other")
            .await
            .unwrap();

        assert_eq!(first, DispatchOutcome::Executed(DeviceAction::Tap { x: 1440, y: 900 }));
        assert_eq!(second, DispatchOutcome::Executed(DeviceAction::KeyEvent { code: 4 }));
        assert_eq!(
            fake_adb_calls(&dir),
            vec![
                "-s ea499ae7 shell input tap 1440 900",
                "-s other shell input keyevent 4",
            ]
        );
    }
}
