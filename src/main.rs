use adb_screen_match::args::{Args, Mode, Parsed, print_help};
use adb_screen_match::pipeline;
use adb_screen_match::{AutomationError, DispatchOutcome, PipelineConfig};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::parse_from(std::env::args().skip(1), PipelineConfig::from_env()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Parsed::Version) => {
            println!(
                "ADB Screen Match v{} © {} Vigor Solutions",
                env!("APP_VERSION_DISPLAY"),
                env!("APP_BUILD_YEAR")
            );
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("❌ {e}");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let default_filter = if args.debug_mode { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match execute(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: &Args) -> Result<(), AutomationError> {
    let config = &args.config;
    match &args.mode {
        Mode::Screenshot => {
            println!("📸 Capturing screen of device {}...", config.device_id);
            let path = pipeline::capture(config).await?;
            println!("✅ Screenshot saved to {}", path.display());
        }
        Mode::Offline(screen) => {
            println!(
                "🔍 Matching {} against {} template(s)...",
                screen.display(),
                config.template_paths.len()
            );
            let (_, best) = pipeline::match_screen(config, screen)?;
            match best {
                Some(best) => println!("🎯 Best match: {best}"),
                None => println!("🤷 No template matched"),
            }
        }
        Mode::Run => {
            print_run_header(config);
            let dispatcher = pipeline::table_dispatcher(config)?;
            let report = pipeline::run(config, &dispatcher).await?;
            match (&report.best_match, &report.dispatch) {
                (Some(best), Some(DispatchOutcome::Executed(action))) => {
                    println!("🎯 Best match: {best}");
                    println!("👆 Performed {action}");
                }
                (Some(best), _) => {
                    println!("🎯 Best match: {best}");
                    println!("⚠️ No action configured for '{}'", best.name());
                }
                (None, _) => println!("🤷 No template matched"),
            }
        }
    }
    Ok(())
}

fn print_run_header(config: &PipelineConfig) {
    println!(
        "🚀 Device {} | {} template(s) at {} | output {}",
        config.device_id,
        config.template_paths.len(),
        config.template_resolution,
        config.output_dir.display()
    );
}
