mod console;
mod loader;
mod render;
mod script;

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use fridge_core::clock::Clock;
use fridge_core::clock::SystemClock;
use fridge_core::config::Config;
use fridge_core::reducer::replay_with;
use fridge_core::reducer::DashboardEffect;
use fridge_core::state::AppState;
use log::info;
use serde::Serialize;

use crate::loader::load_config;
use crate::loader::load_dashboard;
use crate::loader::DEFAULT_DASHBOARD_PATH;
use crate::render::render_frame;
use crate::script::parse_script;

#[derive(Parser, Debug)]
#[command(name = "fridge", version, about = "Kitchen e-ink dashboard driven from the terminal")]
struct Cli {
    /// Configuration file (.json, .yaml, .yml or .toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dashboard JSON; the built-in demo is used when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_DASHBOARD_PATH)]
    data: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    frame: &'a [String],
    state: &'a AppState,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive dashboard in the terminal (default).
    Run {
        #[arg(long, default_value_t = 200)]
        tick_ms: u64,
    },
    /// Feed an event script through the reducer and print the final frame.
    Replay {
        script: PathBuf,
        /// Print the final frame and state as JSON.
        #[arg(long)]
        json: bool,
        /// Frame height used for the row budget.
        #[arg(long, default_value_t = 24)]
        rows: usize,
        /// Replay start in Unix milliseconds; defaults to now.
        #[arg(long)]
        start_ms: Option<u64>,
    },
    /// Print the effective configuration as JSON.
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Run { tick_ms: 200 }) {
        Command::Run { tick_ms } => {
            let now_ms = SystemClock.now_ms();
            let state = initial_state(&cli.data, &config, now_ms)?;
            console::run(state, &config, Duration::from_millis(tick_ms.max(1)))
                .context("terminal session failed")?;
        }
        Command::Replay {
            script,
            json,
            rows,
            start_ms,
        } => {
            let start_ms = start_ms.unwrap_or_else(|| SystemClock.now_ms());
            let mut state = initial_state(&cli.data, &config, start_ms)?;
            let lines = replay_script(&script, &mut state, &config, rows, start_ms)?;
            if json {
                let report = ReplayReport {
                    frame: &lines,
                    state: &state,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn initial_state(data: &Path, config: &Config, now_ms: u64) -> Result<AppState> {
    let model = load_dashboard(data, now_ms).context("failed to load dashboard")?;
    info!(
        "dashboard: {} reminders, {} memos, home {}",
        model.reminders.len(),
        model.memos.len(),
        config.home_variant.label()
    );
    Ok(AppState::new(model, config, now_ms))
}

/// Runs every step with a frame in between, as the live loop does, and
/// returns the last frame.
fn replay_script(
    path: &Path,
    state: &mut AppState,
    config: &Config,
    rows: usize,
    start_ms: u64,
) -> Result<Vec<String>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let steps = parse_script(&source).with_context(|| format!("invalid script {}", path.display()))?;

    let mut frame = render_frame(state, config, rows, start_ms);
    let events = steps.iter().map(|step| step.resolve(start_ms));
    replay_with(state, events, config, |state, at_ms, effects| {
        if effects.contains(&DashboardEffect::TimerFinished) {
            info!("timer finished at +{}ms", at_ms.saturating_sub(start_ms));
        }
        frame = render_frame(state, config, rows, at_ms);
    });
    Ok(frame)
}
