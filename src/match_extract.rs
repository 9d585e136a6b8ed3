use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::source::MatchDocument;
use crate::teams::team_id;

/// Match result margin. Exactly one of runs/wickets, or no result at all;
/// the table writer projects this back into two mutually exclusive columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    NoResult,
    ByRuns(u32),
    ByWickets(u32),
}

impl MatchOutcome {
    pub fn margin_runs(&self) -> Option<u32> {
        match self {
            MatchOutcome::ByRuns(margin) => Some(*margin),
            _ => None,
        }
    }

    pub fn margin_wickets(&self) -> Option<u32> {
        match self {
            MatchOutcome::ByWickets(margin) => Some(*margin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_id: String,
    pub match_date: Option<NaiveDate>,
    pub season: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_winner_id: Option<String>,
    pub toss_decision: Option<String>,
    pub outcome_winner: Option<String>,
    pub outcome_winner_id: Option<String>,
    pub outcome: MatchOutcome,
    pub player_of_match: Option<String>,
    pub match_number: Option<u32>,
    pub scheduled_overs: Option<u32>,
    // Backfilled after dimension building.
    pub venue_id: Option<String>,
    pub season_id: Option<String>,
}

/// Extract the match-level record. Team-valued fields are canonicalized
/// before any id derivation. A malformed date fails the whole document.
pub fn extract_match(doc: &MatchDocument, match_id: &str) -> Result<MatchRecord> {
    let info = &doc.info;

    let team1 = info.teams.first().map(|t| crate::teams::canonical_team_name(t));
    let team2 = info.teams.get(1).map(|t| crate::teams::canonical_team_name(t));

    let match_date = earliest_date(&info.dates)?;
    let season = match_date.map(|date| format!("IPL {}", date.format("%Y")));

    let toss_winner = info
        .toss
        .winner
        .as_deref()
        .map(crate::teams::canonical_team_name);
    let outcome_winner = info
        .outcome
        .winner
        .as_deref()
        .map(crate::teams::canonical_team_name);

    let outcome = match (info.outcome.by.runs, info.outcome.by.wickets) {
        (Some(runs), _) => MatchOutcome::ByRuns(runs),
        (None, Some(wickets)) => MatchOutcome::ByWickets(wickets),
        (None, None) => MatchOutcome::NoResult,
    };

    Ok(MatchRecord {
        match_id: match_id.to_string(),
        match_date,
        season,
        venue: info.venue.clone(),
        city: info.city.clone(),
        team1_id: team1.as_deref().map(team_id),
        team2_id: team2.as_deref().map(team_id),
        team1,
        team2,
        toss_winner_id: toss_winner.as_deref().map(team_id),
        toss_winner,
        toss_decision: info.toss.decision.clone(),
        outcome_winner_id: outcome_winner.as_deref().map(team_id),
        outcome_winner,
        outcome,
        player_of_match: info.player_of_match.first().cloned(),
        match_number: info.event.match_number,
        scheduled_overs: info.overs,
        venue_id: None,
        season_id: None,
    })
}

/// Earliest date in the document's date list; None when the list is empty.
/// Multi-day fixtures list several dates and the season comes from the first
/// day of play.
fn earliest_date(dates: &[String]) -> Result<Option<NaiveDate>> {
    let mut earliest: Option<NaiveDate> = None;
    for raw in dates {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("malformed match date {raw:?}"))?;
        earliest = Some(match earliest {
            Some(current) if current <= date => current,
            _ => date,
        });
    }
    Ok(earliest)
}

#[cfg(test)]
mod tests {
    use super::{MatchOutcome, extract_match};
    use crate::source::MatchDocument;

    fn doc(raw: &str) -> MatchDocument {
        serde_json::from_str(raw).expect("test document should parse")
    }

    #[test]
    fn extracts_canonical_teams_and_ids() {
        let doc = doc(r#"{
            "info": {
                "teams": ["Delhi Daredevils", "Mumbai Indians"],
                "dates": ["2018-04-07"],
                "toss": {"winner": "Delhi Daredevils", "decision": "bat"},
                "outcome": {"winner": "Mumbai Indians", "by": {"runs": 12}}
            },
            "innings": []
        }"#);
        let record = extract_match(&doc, "m1").expect("extraction should succeed");
        assert_eq!(record.team1.as_deref(), Some("Delhi Capitals"));
        assert_eq!(record.team1_id.as_deref(), Some("dc"));
        assert_eq!(record.toss_winner.as_deref(), Some("Delhi Capitals"));
        assert_eq!(record.outcome, MatchOutcome::ByRuns(12));
        assert_eq!(record.season.as_deref(), Some("IPL 2018"));
    }

    #[test]
    fn no_dates_means_no_season_not_an_error() {
        let doc = doc(r#"{"info": {"teams": ["A", "B"]}, "innings": []}"#);
        let record = extract_match(&doc, "m2").expect("extraction should succeed");
        assert!(record.match_date.is_none());
        assert!(record.season.is_none());
        assert_eq!(record.outcome, MatchOutcome::NoResult);
    }

    #[test]
    fn malformed_date_fails_the_document() {
        let doc = doc(r#"{"info": {"dates": ["07/04/2018"]}, "innings": []}"#);
        assert!(extract_match(&doc, "m3").is_err());
    }

    #[test]
    fn season_uses_earliest_date() {
        let doc = doc(r#"{"info": {"dates": ["2019-05-02", "2018-12-30"]}, "innings": []}"#);
        let record = extract_match(&doc, "m4").expect("extraction should succeed");
        assert_eq!(record.season.as_deref(), Some("IPL 2018"));
    }

    #[test]
    fn runs_margin_wins_over_wickets_when_both_present() {
        let doc = doc(r#"{
            "info": {"outcome": {"by": {"runs": 5, "wickets": 3}}},
            "innings": []
        }"#);
        let record = extract_match(&doc, "m5").expect("extraction should succeed");
        assert_eq!(record.outcome.margin_runs(), Some(5));
        assert_eq!(record.outcome.margin_wickets(), None);
    }
}
