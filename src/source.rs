use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// One Cricsheet match document. Field requirements are deliberate: a
/// delivery missing its batter or bowler is malformed and fails the whole
/// document at parse time, which the pipeline catches at the per-document
/// boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDocument {
    #[serde(default)]
    pub info: MatchInfo,
    #[serde(default)]
    pub innings: Vec<Innings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub toss: Toss,
    #[serde(default)]
    pub outcome: RawOutcome,
    #[serde(default)]
    pub player_of_match: Vec<String>,
    #[serde(default)]
    pub registry: Registry,
    /// Team name -> playing-eleven names.
    #[serde(default)]
    pub players: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub event: EventInfo,
    /// Scheduled overs per innings (20 for IPL).
    #[serde(default)]
    pub overs: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Toss {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOutcome {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub by: RawMargin,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMargin {
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub wickets: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    /// Player name -> external registry id.
    #[serde(default)]
    pub people: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInfo {
    #[serde(default)]
    pub match_number: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Innings {
    pub team: String,
    #[serde(default)]
    pub super_over: bool,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default)]
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub runs: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Over {
    pub over: u32,
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub batter: String,
    pub bowler: String,
    pub non_striker: String,
    #[serde(default)]
    pub runs: DeliveryRuns,
    #[serde(default)]
    pub extras: DeliveryExtras,
    #[serde(default)]
    pub wickets: Vec<WicketEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryRuns {
    #[serde(default)]
    pub batter: u32,
    #[serde(default)]
    pub extras: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryExtras {
    #[serde(default)]
    pub wides: u32,
    #[serde(default)]
    pub noballs: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub legbyes: u32,
    #[serde(default)]
    pub penalty: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WicketEntry {
    pub kind: String,
    pub player_out: String,
    #[serde(default)]
    pub fielders: Vec<Fielder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fielder {
    #[serde(default)]
    pub name: Option<String>,
}

/// Enumerate the match files of a corpus directory, sorted by path so every
/// run visits documents in the same order.
pub fn list_match_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("read corpus directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.context("read corpus directory entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// match_id is the file name without its extension.
pub fn match_id_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .ok_or_else(|| anyhow!("unusable match file name {}", path.display()))
}

pub fn read_match_document(path: &Path) -> Result<MatchDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read match file {}", path.display()))?;
    serde_json::from_str::<MatchDocument>(&raw)
        .with_context(|| format!("parse match json {}", path.display()))
}
