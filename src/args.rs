use crate::config::{PipelineConfig, discover_templates};
use crate::template_matching::Resolution;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Capture, match and dispatch
    Run,
    /// Capture only
    Screenshot,
    /// Match an existing screenshot, no device needed
    Offline(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub config: PipelineConfig,
}

/// Outcome of flag parsing
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(Args),
    Help,
    Version,
}

impl Args {
    /// Parse flags on top of `base`, usually [`PipelineConfig::from_env`]
    pub fn parse_from<I>(args: I, base: PipelineConfig) -> Result<Parsed, String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut config = base;
        let mut mode = Mode::Run;
        let mut debug_mode = false;
        let mut templates: Vec<PathBuf> = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                return Ok(Parsed::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Parsed::Version);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--screenshot" || arg == "-s" {
                mode = Mode::Screenshot;
            } else if let Some(val) = arg.strip_prefix("--screen=") {
                mode = Mode::Offline(PathBuf::from(non_empty("--screen", val)?));
            } else if let Some(val) = arg.strip_prefix("--device=") {
                config.device_id = non_empty("--device", val)?.to_string();
            } else if let Some(val) = arg.strip_prefix("--adb=") {
                config.adb_path = PathBuf::from(non_empty("--adb", val)?);
            } else if let Some(val) = arg.strip_prefix("--template=") {
                templates.push(PathBuf::from(non_empty("--template", val)?));
            } else if let Some(val) = arg.strip_prefix("--references=") {
                let dir = PathBuf::from(non_empty("--references", val)?);
                let found = discover_templates(&dir)
                    .map_err(|e| format!("Cannot read references directory {}: {e}", dir.display()))?;
                if found.is_empty() {
                    return Err(format!("No *.png templates found in {}", dir.display()));
                }
                templates.extend(found);
            } else if let Some(val) = arg.strip_prefix("--output=") {
                config.output_dir = PathBuf::from(non_empty("--output", val)?);
            } else if let Some(val) = arg.strip_prefix("--resolution=") {
                config.template_resolution = val
                    .parse::<Resolution>()
                    .map_err(|e| e.to_string())?;
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                let secs = val
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| format!("Invalid timeout value: {val}"))?;
                config.command_timeout = Duration::from_secs(secs);
            } else if let Some(val) = arg.strip_prefix("--actions=") {
                config.action_table = Some(PathBuf::from(non_empty("--actions", val)?));
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        if !templates.is_empty() {
            config.template_paths = templates;
        }

        Ok(Parsed::Run(Args {
            mode,
            debug_mode,
            config,
        }))
    }
}

fn non_empty<'a>(flag: &str, val: &'a str) -> Result<&'a str, String> {
    let val = val.trim();
    if val.is_empty() {
        Err(format!("{flag} needs a value"))
    } else {
        Ok(val)
    }
}

pub fn print_help() {
    println!("🤖 ADB Screen Match");
    println!();
    println!("USAGE:");
    println!("    adb-screen-match [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)           Capture the screen, match templates, run the mapped action");
    println!("    --screenshot, -s     Only capture the screen to <output>/<device>_current_screen.png");
    println!("    --screen=<path>      Match an existing screenshot instead of capturing (no device)");
    println!("    --device=<serial>    Device serial (default: $ANDROID_SERIAL or ea499ae7)");
    println!("    --adb=<path>         ADB binary (default: $ADB_PATH or adb)");
    println!("    --template=<path>    Template image, repeatable, evaluated in order");
    println!("    --references=<dir>   Use every *.png in <dir> as a template (sorted by name)");
    println!("    --output=<dir>       Output directory (default: images/tests)");
    println!("    --resolution=<WxH>   Template resolution screens are scaled to (default: 2880x1800)");
    println!("    --timeout=<secs>     Timeout for each adb command (default: 30)");
    println!("    --actions=<file>     JSON table mapping template names to device actions");
    println!("    --debug              Enable debug output");
    println!("    --help, -h           Show this help message");
    println!("    --version, -v        Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    adb-screen-match --device=emulator-5554 --actions=actions.json");
    println!("    adb-screen-match --references=images/references --screen=shot.png --debug");
    println!("    adb-screen-match --screenshot");
}
