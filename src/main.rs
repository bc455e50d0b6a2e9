//! Jumpmaster headless runner.
//!
//! Builds the level from `config.ini`, feeds it a scripted input sequence and
//! prints the presentation snapshots as JSON lines on stdout.
//!
//! # Script format
//!
//! ```json
//! [
//!   { "ticks": 60, "actions": ["Right"] },
//!   { "ticks": 45, "actions": ["Right", "Jump"] },
//!   { "ticks": 90, "actions": [] }
//! ]
//! ```
//!
//! Without `--script` a short built-in sequence is played.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --config config.ini --print-every 10
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use serde::Deserialize;

use jumpmaster::app::App;
use jumpmaster::components::transform::Transform2D;
use jumpmaster::resources::actions::Action;
use jumpmaster::resources::gameconfig::GameConfig;

/// Jumpmaster headless runner
#[derive(Parser)]
#[command(version, about = "Runs the platformer behaviour layer without a window.")]
struct Cli {
    /// Engine configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Stop after this many ticks, even if the script is longer.
    #[arg(long)]
    ticks: Option<u32>,

    /// Host tick duration in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON input script.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Print a snapshot every N ticks (0 prints only the last one).
    #[arg(long, default_value_t = 0)]
    print_every: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    ticks: u32,
    #[serde(default)]
    actions: Vec<Action>,
}

fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep {
            ticks: 30,
            actions: vec![],
        },
        ScriptStep {
            ticks: 40,
            actions: vec![Action::Right],
        },
        ScriptStep {
            ticks: 45,
            actions: vec![Action::Right, Action::Jump],
        },
        ScriptStep {
            ticks: 120,
            actions: vec![Action::Right],
        },
        ScriptStep {
            ticks: 60,
            actions: vec![],
        },
    ]
}

fn load_script(path: &PathBuf) -> Result<Vec<ScriptStep>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(err) = config.load_from_file() {
        log::warn!("{err}; using default settings");
    }

    let script = match &cli.script {
        Some(path) => load_script(path)?,
        None => demo_script(),
    };
    let total: u32 = script.iter().map(|s| s.ticks).sum();
    let limit = cli.ticks.unwrap_or(total).min(total);

    let mut app = App::from_config(&config)?;
    info!("Running {limit} ticks of {:.4}s", cli.dt);

    let mut tick = 0;
    let mut last = None;
    'script: for step in &script {
        for _ in 0..step.ticks {
            if tick >= limit {
                break 'script;
            }
            let snapshot = app.step(&step.actions, cli.dt)?;
            tick += 1;
            if cli.print_every > 0 && tick % cli.print_every == 0 {
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            last = Some(snapshot);
        }
    }

    if let Some(snapshot) = last {
        if cli.print_every == 0 {
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        let player = app.player();
        if let Some(transform) = app.world().get::<Transform2D>(player) {
            info!(
                "Finished after {tick} ticks, player at ({:.2}, {:.2})",
                transform.position.x, transform.position.y
            );
        }
    }
    Ok(())
}
