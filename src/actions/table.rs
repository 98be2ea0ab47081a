//! Template name to device action mapping

use super::error::ActionError;
use crate::template_matching::template_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A single input event sent to the device.
///
/// Tap and swipe coordinates are physical device pixels and reach
/// `adb shell input` unchanged. They are not scaled from the template
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceAction {
    Tap {
        x: u32,
        y: u32,
    },
    Swipe {
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u32>,
    },
    /// Android key code, e.g. 4 for BACK
    KeyEvent {
        code: u32,
    },
    Text {
        text: String,
    },
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAction::Tap { x, y } => write!(f, "tap ({x},{y})"),
            DeviceAction::Swipe {
                x1,
                y1,
                x2,
                y2,
                duration_ms,
            } => {
                write!(f, "swipe ({x1},{y1}) -> ({x2},{y2})")?;
                if let Some(d) = duration_ms {
                    write!(f, " over {d}ms")?;
                }
                Ok(())
            }
            DeviceAction::KeyEvent { code } => write!(f, "keyevent {code}"),
            DeviceAction::Text { text } => write!(f, "text {text:?}"),
        }
    }
}

/// Actions keyed by template file stem.
///
/// Stored as a flat JSON object:
/// `{"ref1": {"type": "tap", "x": 100, "y": 200}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    actions: HashMap<String, DeviceAction>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ActionError> {
        let json = std::fs::read_to_string(path).map_err(|source| ActionError::TableRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = serde_json::from_str(&json).map_err(|source| ActionError::TableParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("🗂️ Loaded {} action(s) from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, name: impl Into<String>, action: DeviceAction) -> Option<DeviceAction> {
        self.actions.insert(name.into(), action)
    }

    /// Action for a template path, looked up by its file stem
    pub fn action_for(&self, template: &Path) -> Option<&DeviceAction> {
        self.actions.get(template_name(template))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
