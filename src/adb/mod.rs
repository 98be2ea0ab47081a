// ADB module - drives an Android device through the external `adb` tool.
// Every command is scoped to one device serial and bounded by a timeout.

pub mod error;
pub mod shell;


pub use error::{AdbError, AdbResult};
pub use shell::{AdbShell, screen_capture_path};
