//! Demo CLI exercising the pathfinder and the object pool from the shell.
//!
//! `gridforge-cli path --grid <file> --from x,y --to x,y` loads a grid
//! pattern file (first line `cols rows`, followed by `rows` lines of `cols`
//! whitespace-separated integers, `0` meaning unwalkable) and prints the
//! resulting path, or reports that none exists.
//!
//! `gridforge-cli bench-pool` exercises [`gridforge::ObjectPool`] growth so
//! a reader can watch the `tracing::warn!` growth log fire.

use clap::{Parser, Subcommand};
use gridforge::{EngineConfig, Grid, ObjectPool, Pathfinder};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gridforge-cli", about = "Demo CLI for the gridforge crate")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a path on a grid loaded from a pattern file.
    Path {
        /// Path to a grid pattern file.
        #[arg(long)]
        grid: PathBuf,
        /// Start coordinate, formatted `x,y`.
        #[arg(long)]
        from: String,
        /// Target coordinate, formatted `x,y`.
        #[arg(long)]
        to: String,
    },
    /// Exercise object pool growth.
    BenchPool {
        /// Initial pool capacity.
        #[arg(long, default_value_t = 4)]
        capacity: usize,
        /// Number of instances to acquire and release without returning them
        /// in between, forcing growth once `capacity` is exceeded.
        #[arg(long, default_value_t = 16)]
        acquisitions: usize,
    },
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad x coordinate `{x}`: {e}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad y coordinate `{y}`: {e}"))?;
    Ok((x, y))
}

fn load_grid(path: &Path) -> Result<Grid, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("reading {path:?}: {e}"))?;
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| "grid file is empty".to_string())?;
    let mut dims = header.split_whitespace();
    let cols: usize = dims
        .next()
        .ok_or_else(|| "missing column count".to_string())?
        .parse()
        .map_err(|e| format!("bad column count: {e}"))?;
    let rows: usize = dims
        .next()
        .ok_or_else(|| "missing row count".to_string())?
        .parse()
        .map_err(|e| format!("bad row count: {e}"))?;

    let mut pattern = Vec::with_capacity(cols * rows);
    for line in lines {
        for token in line.split_whitespace() {
            pattern.push(token.parse::<i32>().map_err(|e| format!("bad cell value: {e}"))?);
        }
    }

    let mut grid = Grid::new(cols, rows).map_err(|e| e.to_string())?;
    grid.import(&pattern);
    Ok(grid)
}

fn run_path(grid_path: PathBuf, from: String, to: String) -> Result<(), String> {
    let grid = load_grid(&grid_path)?;
    let (sx, sy) = parse_point(&from)?;
    let (tx, ty) = parse_point(&to)?;
    let mut pathfinder = Pathfinder::new(grid);
    let outcome = pathfinder.find_path(sx, sy, tx, ty);
    match outcome.path {
        Some(path) => {
            let rendered: Vec<String> = path.iter().map(|(x, y)| format!("({x},{y})")).collect();
            if outcome.found {
                println!("{}", rendered.join(" -> "));
            } else {
                println!("target unreachable, closest route: {}", rendered.join(" -> "));
            }
            Ok(())
        }
        None => {
            println!("no path: start equals target or a coordinate is out of bounds");
            Ok(())
        }
    }
}

fn run_bench_pool(capacity: usize, acquisitions: usize) {
    let mut pool = ObjectPool::with_factory(capacity, || 0u64);
    let mut held = Vec::with_capacity(acquisitions);
    for i in 0..acquisitions {
        held.push(pool.acquire());
        tracing::info!(acquired = i + 1, size = pool.size(), "acquired instance");
    }
    for item in held {
        pool.release(item);
    }
    println!(
        "final pool size {} with {} available",
        pool.size(),
        pool.available()
    );
}

fn main() -> ExitCode {
    gridforge::telemetry::init();
    // Installed before any component is constructed below, so every
    // default-capacity `ObjectPool`/`IndexedMinHeap`/`LruCache` this run
    // creates observes the same loaded configuration.
    EngineConfig::install(EngineConfig::load().unwrap_or_default());
    tracing::debug!(config = ?EngineConfig::global(), "loaded engine configuration");

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Path { grid, from, to } => run_path(grid, from, to),
        Command::BenchPool {
            capacity,
            acquisitions,
        } => {
            run_bench_pool(capacity, acquisitions);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
