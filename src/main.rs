use std::path::PathBuf;

use anyhow::{Context, Result};

use cricsheet_etl::pipeline::{self, EtlConfig};

const DEFAULT_INPUT_DIR: &str = "Match Data JSON";
const DEFAULT_DB_PATH: &str = "data/cricket.sqlite";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let input_dir = parse_path_arg("--input")
        .or_else(|| env_path("CRICKET_JSON_DIR"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let db_path = parse_path_arg("--db")
        .or_else(|| env_path("CRICKET_DB_PATH"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

    let config = EtlConfig { input_dir, db_path };
    let summary = pipeline::run(&config)
        .with_context(|| format!("etl run over {}", config.input_dir.display()))?;

    println!("Cricket ETL complete");
    println!("DB: {}", summary.db_path.display());
    println!(
        "Documents: {}/{} processed ({} skipped)",
        summary.documents_processed, summary.documents_found, summary.documents_skipped
    );
    println!("teams: {}", summary.counts.teams);
    println!("venues: {}", summary.counts.venues);
    println!("seasons: {}", summary.counts.seasons);
    println!("players: {}", summary.counts.players);
    println!("matches: {}", summary.counts.matches);
    println!("ball_events: {}", summary.counts.ball_events);

    if !summary.errors.is_empty() {
        println!("errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!(" - {err}");
        }
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
