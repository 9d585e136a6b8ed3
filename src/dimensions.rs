use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;

use crate::ball_events::BallEvent;
use crate::ids;
use crate::match_extract::MatchRecord;
use crate::players::PlayerEntry;
use crate::teams::{team_abbreviation, team_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub team_id: String,
    pub team_name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueRow {
    pub venue_id: String,
    pub venue_name: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub season_id: String,
    pub season_name: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub player_id: String,
    pub full_name: String,
    pub short_name: String,
    pub registry_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    pub teams: Vec<TeamRow>,
    pub venues: Vec<VenueRow>,
    pub seasons: Vec<SeasonRow>,
    pub players: Vec<PlayerRow>,
}

/// Build the dimension tables from the full corpus of extracted matches and
/// players. Must only run after every document has been merged; dedup is
/// through sorted sets so row order is reproducible, while the ids themselves
/// are pure functions of the natural keys.
pub fn build_dimensions(
    matches: &[MatchRecord],
    players: &HashMap<String, PlayerEntry>,
) -> Dimensions {
    let mut team_names = BTreeSet::new();
    let mut venues = BTreeSet::new();
    let mut seasons = BTreeMap::new();

    for record in matches {
        for team in [&record.team1, &record.team2].into_iter().flatten() {
            team_names.insert(team.clone());
        }
        if let Some(venue) = &record.venue {
            venues.insert((venue.clone(), record.city.clone()));
        }
        if let (Some(season), Some(date)) = (&record.season, record.match_date) {
            seasons.insert(season.clone(), date.year());
        }
    }

    let teams = team_names
        .into_iter()
        .map(|name| TeamRow {
            team_id: team_id(&name),
            abbreviation: team_abbreviation(&name),
            team_name: name,
        })
        .collect();

    let venues = venues
        .into_iter()
        .map(|(name, city)| VenueRow {
            venue_id: ids::venue_id(&name),
            venue_name: name,
            city,
        })
        .collect();

    let seasons = seasons
        .into_iter()
        .map(|(name, year)| SeasonRow {
            season_id: ids::season_id(&name),
            season_name: name,
            year,
        })
        .collect();

    let players = players
        .iter()
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .map(|entry| PlayerRow {
            player_id: entry
                .registry_id
                .clone()
                .unwrap_or_else(|| ids::fallback_player_id(&entry.full_name)),
            full_name: entry.full_name.clone(),
            short_name: entry.short_name.clone(),
            registry_id: entry.registry_id.clone(),
        })
        .collect();

    Dimensions {
        teams,
        venues,
        seasons,
        players,
    }
}

/// Attach venue and season surrogate keys to match rows. A natural key with
/// no dimension row yields a null foreign key, never an error.
pub fn backfill_match_keys(matches: &mut [MatchRecord], dims: &Dimensions) {
    let venue_ids = venue_lookup(dims);
    let season_ids = season_lookup(dims);

    for record in matches {
        record.venue_id = record
            .venue
            .as_deref()
            .and_then(|venue| venue_ids.get(venue).cloned());
        record.season_id = record
            .season
            .as_deref()
            .and_then(|season| season_ids.get(season).cloned());
    }
}

/// Attach player surrogate keys to ball-event rows by full-name lookup.
pub fn backfill_event_keys(events: &mut [BallEvent], dims: &Dimensions) {
    let player_ids = player_lookup(dims);

    for event in events {
        event.batter_id = player_ids.get(event.batter.as_str()).cloned();
        event.bowler_id = player_ids.get(event.bowler.as_str()).cloned();
        event.non_striker_id = player_ids.get(event.non_striker.as_str()).cloned();
    }
}

fn venue_lookup(dims: &Dimensions) -> HashMap<&str, String> {
    dims.venues
        .iter()
        .map(|row| (row.venue_name.as_str(), row.venue_id.clone()))
        .collect()
}

fn season_lookup(dims: &Dimensions) -> HashMap<&str, String> {
    dims.seasons
        .iter()
        .map(|row| (row.season_name.as_str(), row.season_id.clone()))
        .collect()
}

fn player_lookup(dims: &Dimensions) -> HashMap<&str, String> {
    dims.players
        .iter()
        .map(|row| (row.full_name.as_str(), row.player_id.clone()))
        .collect()
}
