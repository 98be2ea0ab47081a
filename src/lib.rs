pub mod actions;
pub mod adb;
pub mod args;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod template_matching;

pub use actions::{ActionDispatcher, ActionTable, DeviceAction, DispatchOutcome, TableDispatcher};
pub use adb::AdbShell;
pub use config::PipelineConfig;
pub use error::AutomationError;
pub use pipeline::PipelineReport;
