use super::error::{AdbError, AdbResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Drives one device through the external `adb` binary
#[derive(Debug, Clone)]
pub struct AdbShell {
    tool: PathBuf,
    device_id: String,
    timeout: Duration,
}

/// Where the screenshot for `device_id` is written inside `output_dir`
pub fn screen_capture_path(output_dir: &Path, device_id: &str) -> PathBuf {
    output_dir.join(format!("{device_id}_current_screen.png"))
}

impl AdbShell {
    pub fn new(tool: impl Into<PathBuf>, device_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            device_id: device_id.into(),
            timeout,
        }
    }

    /// Full argument list for a device-scoped command
    fn device_args<'a>(&'a self, args: &'a [String]) -> impl Iterator<Item = &'a str> {
        ["-s", self.device_id.as_str()]
            .into_iter()
            .chain(args.iter().map(String::as_str))
    }

    fn describe(&self, args: &[String]) -> String {
        std::iter::once(self.tool.to_string_lossy().into_owned())
            .chain(self.device_args(args).map(str::to_string))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run `<tool> -s <device> <args...>` and return its stdout.
    ///
    /// A non-zero exit status is an error. The child is killed if it does not
    /// finish within the configured timeout.
    pub async fn run(&self, args: &[String]) -> AdbResult<Vec<u8>> {
        let command = self.describe(args);
        log::debug!("🔧 {command}");

        let mut cmd = Command::new(&self.tool);
        cmd.args(self.device_args(args)).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AdbError::ToolNotFound {
                    tool: self.tool.clone(),
                });
            }
            Ok(Err(source)) => return Err(AdbError::Spawn { command, source }),
            Err(_) => {
                return Err(AdbError::Timeout {
                    duration: self.timeout,
                    description: command,
                });
            }
        };

        if !output.status.success() {
            return Err(AdbError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Raw PNG bytes of the current screen
    pub async fn screen_capture_bytes(&self) -> AdbResult<Vec<u8>> {
        let args = strings(["exec-out", "screencap", "-p"]);
        let bytes = self.run(&args).await?;
        if bytes.is_empty() {
            return Err(AdbError::EmptyCapture {
                command: self.describe(&args),
            });
        }
        Ok(bytes)
    }

    /// Capture the screen to `{output_dir}/{device_id}_current_screen.png`,
    /// replacing any previous capture.
    pub async fn capture_screen(&self, output_dir: &Path) -> AdbResult<PathBuf> {
        let start = std::time::Instant::now();
        let bytes = self.screen_capture_bytes().await?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| AdbError::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;
        let path = screen_capture_path(output_dir, &self.device_id);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| AdbError::Io {
                path: path.clone(),
                source,
            })?;

        log::info!(
            "📸 Captured {} bytes from {} in {}ms -> {}",
            bytes.len(),
            self.device_id,
            start.elapsed().as_millis(),
            path.display()
        );
        Ok(path)
    }

    pub async fn tap(&self, x: u32, y: u32) -> AdbResult<()> {
        self.input(["tap".to_string(), x.to_string(), y.to_string()])
            .await
    }

    pub async fn swipe(
        &self,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        duration_ms: Option<u32>,
    ) -> AdbResult<()> {
        let mut args = vec![
            "swipe".to_string(),
            x1.to_string(),
            y1.to_string(),
            x2.to_string(),
            y2.to_string(),
        ];
        if let Some(d) = duration_ms {
            args.push(d.to_string());
        }
        self.input(args).await
    }

    pub async fn key_event(&self, code: u32) -> AdbResult<()> {
        self.input(["keyevent".to_string(), code.to_string()])
            .await
    }

    /// Type `text` into the focused field. Spaces are sent as `%s`.
    ///
    /// `adb shell` hands its joined arguments to the device's `sh`, so the
    /// text is single-quoted to reach `input` as one literal word.
    pub async fn input_text(&self, text: &str) -> AdbResult<()> {
        self.input(["text".to_string(), shell_quote(&text.replace(' ', "%s"))])
            .await
    }

    async fn input(&self, input_args: impl IntoIterator<Item = String>) -> AdbResult<()> {
        let args: Vec<String> = ["shell".to_string(), "input".to_string()]
            .into_iter()
            .chain(input_args)
            .collect();
        self.run(&args).await.map(|_| ())
    }
}

/// Single-quote `word` for a POSIX shell
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
