use gravfield::{bench_collisions, bench_tick};
use gravfield::{LibraryThemeService, ScenarioConfig, Session, ThemeResponse};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run this many ticks without a window and print a summary
    #[arg(long)]
    headless: Option<u64>,

    /// Time the integrator and the collision scan, then exit
    #[arg(long)]
    bench: bool,

    /// Theme JSON to apply at startup and add to the theme library
    #[arg(long)]
    theme: Option<PathBuf>,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn load_theme_from_json(path: &Path) -> Result<ThemeResponse> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read theme {}", path.display()))?;
    let theme = ThemeResponse::from_json(&text)
        .with_context(|| format!("failed to parse theme {}", path.display()))?;

    Ok(theme)
}

fn run_headless(mut session: Session, ticks: u64) {
    let mut spawned = 0;
    let mut bursts = 0;
    for _ in 0..ticks {
        let report = session.tick();
        spawned += report.spawned as u64;
        bursts += report.collision.is_some() as u64;
    }
    println!(
        "ticks = {}, particles = {}, spawned = {}, collision bursts = {}",
        session.tick_count(),
        session.particles().len(),
        spawned,
        bursts
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        env_logger::init();
        bench_tick();
        bench_collisions();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut themes = LibraryThemeService::new(scenario_cfg.themes.clone());
    let mut session = Session::build_session(scenario_cfg)?;

    if let Some(path) = &args.theme {
        let theme = load_theme_from_json(path)?;
        session
            .apply_theme(&theme)
            .with_context(|| format!("theme {} rejected", path.display()))?;
        themes.push(theme);
    }

    match args.headless {
        Some(ticks) => {
            env_logger::init();
            info!("running {} ticks headless", ticks);
            run_headless(session, ticks);
        }
        None => run_viewer(session, themes)?,
    }

    Ok(())
}

#[cfg(feature = "viewer")]
fn run_viewer(session: Session, themes: LibraryThemeService) -> Result<()> {
    gravfield::run_2d(session, themes);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_session: Session, _themes: LibraryThemeService) -> Result<()> {
    anyhow::bail!("built without the `viewer` feature, use --headless <ticks>")
}
