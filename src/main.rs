//! launcher-gestures - replay touch traces through the launcher gesture stack
//!
//! Reads JSON-lines touch traces, classifies them and runs the bound actions
//! from the config file.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use launcher_gestures::actions::CommandExecutor;
use launcher_gestures::replay::{read_trace, replay};
use launcher_gestures::{GestureRuntime, Launcher, LauncherConfig};

#[derive(Parser, Debug)]
#[command(name = "launcher-gestures")]
#[command(about = "Launcher gesture recognizer and action dispatcher", long_about = None)]
struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/launcher-gestures/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a recorded touch trace and dispatch the gestures
    Replay {
        /// JSON-lines trace file, `-` for stdin
        trace: PathBuf,

        /// Play samples at their recorded pace on the event loop
        #[arg(long)]
        realtime: bool,

        /// Log actions instead of running their commands
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<()> {
    // Set up panic hook to log panics before crashing
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        let crash_log = log_dir().join("crash.log");
        if let Ok(mut f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&crash_log)
        {
            let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
        }
    }));

    let args = Args::parse();

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).ok();

    // File appender - rotates daily
    let file_appender = rolling::daily(&log_dir, "gestures.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,launcher_gestures=debug"
    } else {
        "warn,launcher_gestures=info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config_path = args.config.unwrap_or_else(LauncherConfig::default_path);
    let config = LauncherConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match args.command {
        Command::Replay { trace, realtime, dry_run } => run_replay(config, trace, realtime, dry_run),
        Command::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Log directory (~/.local/state/launcher-gestures or /tmp/launcher-gestures)
fn log_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("launcher-gestures")
}

fn run_replay(config: LauncherConfig, trace: PathBuf, realtime: bool, dry_run: bool) -> Result<()> {
    let samples = if trace.as_os_str() == "-" {
        read_trace(std::io::stdin().lock())?
    } else {
        let file = File::open(&trace).with_context(|| format!("opening {}", trace.display()))?;
        read_trace(BufReader::new(file))?
    };
    info!(samples = samples.len(), realtime, dry_run, "replaying touch trace");

    let executor = if dry_run {
        CommandExecutor::dry_run(config.commands.clone())
    } else {
        CommandExecutor::new(config.commands.clone())
    };
    let mut launcher = Launcher::new(executor, config.bindings.clone(), config.policy).record_outcomes();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if realtime {
        let mut runtime = GestureRuntime::new(config.gestures.clone(), launcher)?;
        runtime.play(samples)?;
        for outcome in runtime.host_mut().take_outcomes() {
            writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
        }
    } else {
        for timed in replay(config.gestures.clone(), samples) {
            // Failures are recorded in the outcome and reported below
            let _ = launcher.handle(timed.gesture);
            for outcome in launcher.take_outcomes() {
                let line = serde_json::json!({ "at_ms": timed.at_ms, "outcome": outcome });
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}
