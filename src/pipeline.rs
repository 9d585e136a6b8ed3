use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::ball_events::{BallEvent, extract_ball_events};
use crate::dimensions::{backfill_event_keys, backfill_match_keys, build_dimensions};
use crate::match_extract::{MatchRecord, extract_match};
use crate::players::{PlayerEntry, extract_players, merge_players};
use crate::source::{list_match_files, match_id_for, read_match_document};
use crate::tables::{Dataset, TableCounts, write_tables};

#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub input_dir: PathBuf,
    pub db_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub db_path: PathBuf,
    pub documents_found: usize,
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub counts: TableCounts,
    pub errors: Vec<String>,
}

/// Everything one document contributes before the corpus-wide merge.
struct DocumentExtract {
    match_record: MatchRecord,
    players: HashMap<String, PlayerEntry>,
    events: Vec<BallEvent>,
}

/// Run the full ETL: parallel per-document extraction, sequential merge in
/// sorted file order, dimension build once every document has finished, key
/// backfill, then the atomic six-table write. The whole dataset is a pure
/// function of the input directory.
pub fn run(config: &EtlConfig) -> Result<RunSummary> {
    let files = list_match_files(&config.input_dir)?;

    let extracts = with_pool(|| {
        files
            .par_iter()
            .map(|path| process_file(path))
            .collect::<Vec<_>>()
    });

    // Sequential merge: the only point where per-document results meet.
    // A failed document is logged, counted, and skipped for the whole run.
    let mut matches = Vec::new();
    let mut events = Vec::new();
    let mut players: HashMap<String, PlayerEntry> = HashMap::new();
    let mut errors = Vec::new();

    for (path, extract) in files.iter().zip(extracts) {
        match extract {
            Ok(extract) => {
                matches.push(extract.match_record);
                events.extend(extract.events);
                merge_players(&mut players, extract.players);
            }
            Err(err) => {
                eprintln!("skipping {}: {err:#}", path.display());
                errors.push(format!("{}: {err:#}", path.display()));
            }
        }
    }

    let documents_found = files.len();
    let documents_skipped = errors.len();
    let documents_processed = documents_found - documents_skipped;

    // Barrier: every document is merged before any surrogate key exists.
    let dims = build_dimensions(&matches, &players);
    backfill_match_keys(&mut matches, &dims);
    backfill_event_keys(&mut events, &dims);

    let dataset = Dataset {
        dims,
        matches,
        events,
    };
    let counts = write_tables(&config.db_path, &dataset)
        .context("write output tables")?;

    Ok(RunSummary {
        db_path: config.db_path.clone(),
        documents_found,
        documents_processed,
        documents_skipped,
        counts,
        errors,
    })
}

fn process_file(path: &Path) -> Result<DocumentExtract> {
    let match_id = match_id_for(path)?;
    let doc = read_match_document(path)?;
    let match_record = extract_match(&doc, &match_id)
        .with_context(|| format!("extract match {match_id}"))?;
    let players = extract_players(&doc);
    let events = extract_ball_events(&doc, &match_id);
    Ok(DocumentExtract {
        match_record,
        players,
        events,
    })
}

fn with_pool<T: Send>(action: impl FnOnce() -> T + Send) -> T {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(etl_parallelism())
        .build()
        .ok();
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

fn etl_parallelism() -> usize {
    env::var("ETL_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(4, |n| n.get()))
        .clamp(1, 32)
}
