use crate::adb::AdbError;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for loading action tables and executing device actions.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Failed to read action table {path:?}: {source}")]
    TableRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid action table {path:?}: {source}")]
    TableParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Device action failed: {source}")]
    Adb {
        #[from]
        source: AdbError,
    },
}
