use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::ball_events::BallEvent;
use crate::dimensions::Dimensions;
use crate::match_extract::MatchRecord;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub dims: Dimensions,
    pub matches: Vec<MatchRecord>,
    pub events: Vec<BallEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub teams: usize,
    pub venues: usize,
    pub seasons: usize,
    pub players: usize,
    pub matches: usize,
    pub ball_events: usize,
}

/// Persist all six tables as one atomic unit: build a fresh database at a
/// temporary path, then rename it over the target. A failed run deletes the
/// temp file and leaves any previous dataset untouched.
pub fn write_tables(db_path: &Path, dataset: &Dataset) -> Result<TableCounts> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(db_path);
    let _ = fs::remove_file(&tmp_path);

    let result = write_to(&tmp_path, dataset);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }

    fs::rename(&tmp_path, db_path)
        .with_context(|| format!("publish dataset to {}", db_path.display()))?;
    result
}

fn tmp_path_for(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    db_path.with_file_name(name)
}

fn write_to(path: &Path, dataset: &Dataset) -> Result<TableCounts> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;

    let tx = conn.transaction().context("begin dataset transaction")?;
    insert_teams(&tx, dataset)?;
    insert_venues(&tx, dataset)?;
    insert_seasons(&tx, dataset)?;
    insert_players(&tx, dataset)?;
    insert_matches(&tx, dataset)?;
    insert_ball_events(&tx, dataset)?;
    tx.commit().context("commit dataset transaction")?;

    Ok(TableCounts {
        teams: dataset.dims.teams.len(),
        venues: dataset.dims.venues.len(),
        seasons: dataset.dims.seasons.len(),
        players: dataset.dims.players.len(),
        matches: dataset.matches.len(),
        ball_events: dataset.events.len(),
    })
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            team_id TEXT PRIMARY KEY,
            team_name TEXT NOT NULL,
            abbreviation TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS venues (
            venue_id TEXT NOT NULL,
            venue_name TEXT NOT NULL,
            city TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS seasons (
            season_id TEXT PRIMARY KEY,
            season_name TEXT NOT NULL,
            year INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS players (
            player_id TEXT NOT NULL,
            full_name TEXT NOT NULL,
            short_name TEXT NOT NULL,
            registry_id TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS matches (
            match_id TEXT PRIMARY KEY,
            match_date TEXT NULL,
            season TEXT NULL,
            venue TEXT NULL,
            city TEXT NULL,
            team1 TEXT NULL,
            team2 TEXT NULL,
            team1_id TEXT NULL,
            team2_id TEXT NULL,
            toss_winner TEXT NULL,
            toss_winner_id TEXT NULL,
            toss_decision TEXT NULL,
            outcome_winner TEXT NULL,
            outcome_winner_id TEXT NULL,
            outcome_margin_runs INTEGER NULL,
            outcome_margin_wickets INTEGER NULL,
            player_of_match TEXT NULL,
            match_number INTEGER NULL,
            overs INTEGER NULL,
            venue_id TEXT NULL,
            season_id TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS ball_events (
            ball_id TEXT PRIMARY KEY,
            event_id INTEGER NOT NULL,
            match_id TEXT NOT NULL,
            innings INTEGER NOT NULL,
            batting_team TEXT NOT NULL,
            batting_team_id TEXT NOT NULL,
            bowling_team TEXT NOT NULL,
            bowling_team_id TEXT NOT NULL,
            over_num INTEGER NOT NULL,
            ball_num INTEGER NOT NULL,
            batter TEXT NOT NULL,
            bowler TEXT NOT NULL,
            non_striker TEXT NOT NULL,
            runs_off_bat INTEGER NOT NULL,
            runs_extras INTEGER NOT NULL,
            runs_total INTEGER NOT NULL,
            runs_conceded INTEGER NOT NULL,
            runs_wide INTEGER NOT NULL,
            runs_noball INTEGER NOT NULL,
            runs_bye INTEGER NOT NULL,
            runs_legbye INTEGER NOT NULL,
            runs_penalty INTEGER NOT NULL,
            extra_type TEXT NULL,
            wicket_type TEXT NULL,
            player_out TEXT NULL,
            fielder TEXT NULL,
            is_wicket INTEGER NOT NULL,
            is_bowler_wicket INTEGER NOT NULL,
            is_batter_out INTEGER NOT NULL,
            phase TEXT NOT NULL,
            is_legal INTEGER NOT NULL,
            is_dot INTEGER NOT NULL,
            is_boundary INTEGER NOT NULL,
            is_four INTEGER NOT NULL,
            is_six INTEGER NOT NULL,
            is_super_over INTEGER NOT NULL,
            target_runs INTEGER NULL,
            batter_id TEXT NULL,
            bowler_id TEXT NULL,
            non_striker_id TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season_id);
        CREATE INDEX IF NOT EXISTS idx_matches_venue ON matches(venue_id);
        CREATE INDEX IF NOT EXISTS idx_ball_events_match ON ball_events(match_id);
        CREATE INDEX IF NOT EXISTS idx_ball_events_batter ON ball_events(batter_id);
        CREATE INDEX IF NOT EXISTS idx_ball_events_bowler ON ball_events(bowler_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

fn insert_teams(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare("INSERT INTO teams (team_id, team_name, abbreviation) VALUES (?1, ?2, ?3)")
        .context("prepare teams insert")?;
    for row in &dataset.dims.teams {
        stmt.execute(params![row.team_id, row.team_name, row.abbreviation])
            .context("insert team row")?;
    }
    Ok(())
}

fn insert_venues(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare("INSERT INTO venues (venue_id, venue_name, city) VALUES (?1, ?2, ?3)")
        .context("prepare venues insert")?;
    for row in &dataset.dims.venues {
        stmt.execute(params![row.venue_id, row.venue_name, row.city])
            .context("insert venue row")?;
    }
    Ok(())
}

fn insert_seasons(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare("INSERT INTO seasons (season_id, season_name, year) VALUES (?1, ?2, ?3)")
        .context("prepare seasons insert")?;
    for row in &dataset.dims.seasons {
        stmt.execute(params![row.season_id, row.season_name, row.year])
            .context("insert season row")?;
    }
    Ok(())
}

fn insert_players(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO players (player_id, full_name, short_name, registry_id)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .context("prepare players insert")?;
    for row in &dataset.dims.players {
        stmt.execute(params![
            row.player_id,
            row.full_name,
            row.short_name,
            row.registry_id
        ])
        .context("insert player row")?;
    }
    Ok(())
}

fn insert_matches(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare(
            r#"
            INSERT INTO matches (
                match_id, match_date, season, venue, city,
                team1, team2, team1_id, team2_id,
                toss_winner, toss_winner_id, toss_decision,
                outcome_winner, outcome_winner_id,
                outcome_margin_runs, outcome_margin_wickets,
                player_of_match, match_number, overs, venue_id, season_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?14,
                ?15, ?16,
                ?17, ?18, ?19, ?20, ?21
            )
            "#,
        )
        .context("prepare matches insert")?;
    for m in &dataset.matches {
        stmt.execute(params![
            m.match_id,
            m.match_date.map(|d| d.format("%Y-%m-%d").to_string()),
            m.season,
            m.venue,
            m.city,
            m.team1,
            m.team2,
            m.team1_id,
            m.team2_id,
            m.toss_winner,
            m.toss_winner_id,
            m.toss_decision,
            m.outcome_winner,
            m.outcome_winner_id,
            m.outcome.margin_runs(),
            m.outcome.margin_wickets(),
            m.player_of_match,
            m.match_number,
            m.scheduled_overs,
            m.venue_id,
            m.season_id,
        ])
        .context("insert match row")?;
    }
    Ok(())
}

fn insert_ball_events(tx: &rusqlite::Transaction<'_>, dataset: &Dataset) -> Result<()> {
    let mut stmt = tx
        .prepare(
            r#"
            INSERT INTO ball_events (
                ball_id, event_id, match_id, innings,
                batting_team, batting_team_id, bowling_team, bowling_team_id,
                over_num, ball_num, batter, bowler, non_striker,
                runs_off_bat, runs_extras, runs_total, runs_conceded,
                runs_wide, runs_noball, runs_bye, runs_legbye, runs_penalty,
                extra_type, wicket_type, player_out, fielder,
                is_wicket, is_bowler_wicket, is_batter_out,
                phase, is_legal, is_dot, is_boundary, is_four, is_six,
                is_super_over, target_runs,
                batter_id, bowler_id, non_striker_id
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17,
                ?18, ?19, ?20, ?21, ?22,
                ?23, ?24, ?25, ?26,
                ?27, ?28, ?29,
                ?30, ?31, ?32, ?33, ?34, ?35,
                ?36, ?37,
                ?38, ?39, ?40
            )
            "#,
        )
        .context("prepare ball_events insert")?;
    for e in &dataset.events {
        stmt.execute(params![
            e.ball_id,
            e.event_id,
            e.match_id,
            e.innings,
            e.batting_team,
            e.batting_team_id,
            e.bowling_team,
            e.bowling_team_id,
            e.over_num,
            e.ball_num,
            e.batter,
            e.bowler,
            e.non_striker,
            e.runs_off_bat,
            e.runs_extras,
            e.runs_total,
            e.runs_conceded,
            e.runs_wide,
            e.runs_noball,
            e.runs_bye,
            e.runs_legbye,
            e.runs_penalty,
            e.extra_type.map(|x| x.as_str()),
            e.wicket.as_ref().map(|w| w.kind.as_str()),
            e.wicket.as_ref().map(|w| w.player_out.as_str()),
            e.wicket.as_ref().and_then(|w| w.fielder.as_deref()),
            bool_to_i64(e.is_wicket),
            bool_to_i64(e.is_bowler_wicket),
            bool_to_i64(e.is_batter_out),
            e.phase.as_str(),
            bool_to_i64(e.is_legal),
            bool_to_i64(e.is_dot),
            bool_to_i64(e.is_boundary),
            bool_to_i64(e.is_four),
            bool_to_i64(e.is_six),
            bool_to_i64(e.is_super_over),
            e.target_runs,
            e.batter_id,
            e.bowler_id,
            e.non_striker_id,
        ])
        .context("insert ball event row")?;
    }
    Ok(())
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
