use crate::source::{Delivery, Innings, MatchDocument};
use crate::teams::{canonical_team_name, team_id};

// Phase boundaries over 0-indexed overs of a 20-over innings.
const POWERPLAY_END: u32 = 6;
const DEATH_START: u32 = 15;

// Dismissal kinds credited to the bowler.
const BOWLER_WICKET_KINDS: &[&str] = &[
    "caught",
    "bowled",
    "lbw",
    "stumped",
    "caught and bowled",
    "hit wicket",
];

// Entries recorded against a delivery that are not actual dismissals.
const NON_DISMISSAL_KINDS: &[&str] = &["retired hurt", "retired not out"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Powerplay => "powerplay",
            Phase::Middle => "middle",
            Phase::Death => "death",
        }
    }
}

/// Total over all over numbers: powerplay, then middle, then death from
/// over 16 (1-indexed) onward.
pub fn phase_for_over(over_num: u32) -> Phase {
    if over_num < POWERPLAY_END {
        Phase::Powerplay
    } else if over_num < DEATH_START {
        Phase::Middle
    } else {
        Phase::Death
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraType {
    Wide,
    NoBall,
    Bye,
    LegBye,
    Penalty,
}

impl ExtraType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraType::Wide => "wide",
            ExtraType::NoBall => "noball",
            ExtraType::Bye => "bye",
            ExtraType::LegBye => "legbye",
            ExtraType::Penalty => "penalty",
        }
    }
}

/// At most one dismissal is attributed per delivery; when the source lists
/// several, only the first is kept.
#[derive(Debug, Clone)]
pub struct WicketInfo {
    pub kind: String,
    pub player_out: String,
    pub fielder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BallEvent {
    /// Monotonic per-match counter in source traversal order.
    pub event_id: u32,
    pub match_id: String,
    pub innings: u32,
    pub batting_team: String,
    pub batting_team_id: String,
    pub bowling_team: String,
    pub bowling_team_id: String,
    /// 0-indexed over within the innings.
    pub over_num: u32,
    /// 1-indexed delivery within the over.
    pub ball_num: u32,
    /// Corpus-unique composite key.
    pub ball_id: String,
    pub batter: String,
    pub bowler: String,
    pub non_striker: String,

    pub runs_off_bat: u32,
    pub runs_extras: u32,
    pub runs_total: u32,
    /// Charged to the bowler: off-bat plus wides plus no-balls.
    pub runs_conceded: u32,
    pub runs_wide: u32,
    pub runs_noball: u32,
    pub runs_bye: u32,
    pub runs_legbye: u32,
    pub runs_penalty: u32,
    pub extra_type: Option<ExtraType>,

    pub wicket: Option<WicketInfo>,
    pub is_wicket: bool,
    pub is_bowler_wicket: bool,
    pub is_batter_out: bool,

    pub phase: Phase,
    pub is_legal: bool,
    pub is_dot: bool,
    pub is_boundary: bool,
    pub is_four: bool,
    pub is_six: bool,
    pub is_super_over: bool,
    pub target_runs: Option<u32>,

    // Backfilled after dimension building.
    pub batter_id: Option<String>,
    pub bowler_id: Option<String>,
    pub non_striker_id: Option<String>,
}

/// Walk innings -> overs -> deliveries in source order, emitting one event
/// per delivery. Rows are never re-sorted; event_id is the traversal index.
pub fn extract_ball_events(doc: &MatchDocument, match_id: &str) -> Vec<BallEvent> {
    let match_teams = doc
        .info
        .teams
        .iter()
        .map(|t| canonical_team_name(t))
        .collect::<Vec<_>>();

    let mut events = Vec::new();
    let mut event_id = 0u32;

    for (innings_idx, innings) in doc.innings.iter().enumerate() {
        let innings_num = innings_idx as u32 + 1;
        let batting_team = canonical_team_name(&innings.team);
        let bowling_team = other_team(&match_teams, &batting_team);
        let target_runs = innings.target.as_ref().and_then(|t| t.runs);

        for over in &innings.overs {
            for (ball_idx, delivery) in over.deliveries.iter().enumerate() {
                event_id += 1;
                events.push(build_event(EventContext {
                    event_id,
                    match_id,
                    innings_num,
                    innings,
                    batting_team: &batting_team,
                    bowling_team: &bowling_team,
                    over_num: over.over,
                    ball_num: ball_idx as u32 + 1,
                    target_runs,
                    delivery,
                }));
            }
        }
    }

    events
}

struct EventContext<'a> {
    event_id: u32,
    match_id: &'a str,
    innings_num: u32,
    innings: &'a Innings,
    batting_team: &'a str,
    bowling_team: &'a str,
    over_num: u32,
    ball_num: u32,
    target_runs: Option<u32>,
    delivery: &'a Delivery,
}

fn build_event(ctx: EventContext<'_>) -> BallEvent {
    let delivery = ctx.delivery;
    let extras = &delivery.extras;

    let extra_type = classify_extra(extras);
    let runs_off_bat = delivery.runs.batter;
    let runs_conceded = runs_off_bat + extras.wides + extras.noballs;
    let is_legal = extras.wides == 0 && extras.noballs == 0;

    let wicket = delivery.wickets.first().map(|w| WicketInfo {
        kind: w.kind.clone(),
        player_out: w.player_out.clone(),
        fielder: w.fielders.first().and_then(|f| f.name.clone()),
    });
    let is_wicket = wicket
        .as_ref()
        .is_some_and(|w| !NON_DISMISSAL_KINDS.contains(&w.kind.as_str()));
    let is_bowler_wicket = wicket
        .as_ref()
        .is_some_and(|w| BOWLER_WICKET_KINDS.contains(&w.kind.as_str()));
    let is_batter_out = is_wicket
        && wicket
            .as_ref()
            .is_some_and(|w| w.player_out == delivery.batter);

    BallEvent {
        event_id: ctx.event_id,
        match_id: ctx.match_id.to_string(),
        innings: ctx.innings_num,
        batting_team: ctx.batting_team.to_string(),
        batting_team_id: team_id(ctx.batting_team),
        bowling_team: ctx.bowling_team.to_string(),
        bowling_team_id: team_id(ctx.bowling_team),
        over_num: ctx.over_num,
        ball_num: ctx.ball_num,
        ball_id: format!(
            "{}_{}_{}.{}",
            ctx.match_id, ctx.innings_num, ctx.over_num, ctx.ball_num
        ),
        batter: delivery.batter.clone(),
        bowler: delivery.bowler.clone(),
        non_striker: delivery.non_striker.clone(),

        runs_off_bat,
        runs_extras: delivery.runs.extras,
        runs_total: delivery.runs.total,
        runs_conceded,
        runs_wide: extras.wides,
        runs_noball: extras.noballs,
        runs_bye: extras.byes,
        runs_legbye: extras.legbyes,
        runs_penalty: extras.penalty,
        extra_type,

        is_wicket,
        is_bowler_wicket,
        is_batter_out,
        wicket,

        phase: phase_for_over(ctx.over_num),
        is_legal,
        is_dot: is_legal && runs_conceded == 0,
        // Boundaries count off the bat only, never bye-assisted totals.
        is_boundary: runs_off_bat == 4 || runs_off_bat == 6,
        is_four: runs_off_bat == 4,
        is_six: runs_off_bat == 6,
        is_super_over: ctx.innings.super_over,
        target_runs: ctx.target_runs,

        batter_id: None,
        bowler_id: None,
        non_striker_id: None,
    }
}

/// Single reported extra category by fixed priority; the source never
/// documents an ordering for simultaneous categories, so wide > noball >
/// bye > legbye > penalty stands until verified.
fn classify_extra(extras: &crate::source::DeliveryExtras) -> Option<ExtraType> {
    if extras.wides > 0 {
        Some(ExtraType::Wide)
    } else if extras.noballs > 0 {
        Some(ExtraType::NoBall)
    } else if extras.byes > 0 {
        Some(ExtraType::Bye)
    } else if extras.legbyes > 0 {
        Some(ExtraType::LegBye)
    } else if extras.penalty > 0 {
        Some(ExtraType::Penalty)
    } else {
        None
    }
}

fn other_team(match_teams: &[String], batting_team: &str) -> String {
    match_teams
        .iter()
        .find(|team| team.as_str() != batting_team)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{ExtraType, Phase, extract_ball_events, phase_for_over};
    use crate::source::MatchDocument;

    fn doc(raw: &str) -> MatchDocument {
        serde_json::from_str(raw).expect("test document should parse")
    }

    fn one_delivery_doc(delivery_json: &str) -> MatchDocument {
        doc(&format!(
            r#"{{
                "info": {{"teams": ["Chennai Super Kings", "Mumbai Indians"]}},
                "innings": [{{
                    "team": "Chennai Super Kings",
                    "overs": [{{"over": 0, "deliveries": [{delivery_json}]}}]
                }}]
            }}"#
        ))
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(phase_for_over(0), Phase::Powerplay);
        assert_eq!(phase_for_over(5), Phase::Powerplay);
        assert_eq!(phase_for_over(6), Phase::Middle);
        assert_eq!(phase_for_over(14), Phase::Middle);
        assert_eq!(phase_for_over(15), Phase::Death);
        assert_eq!(phase_for_over(40), Phase::Death);
    }

    #[test]
    fn wide_delivery_is_illegal_and_conceded() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "runs": {"batter": 0, "extras": 1, "total": 1},
                "extras": {"wides": 1}}"#,
        );
        let events = extract_ball_events(&doc, "m1");
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!(!event.is_legal);
        assert!(!event.is_dot);
        assert_eq!(event.runs_conceded, 1);
        assert_eq!(event.extra_type, Some(ExtraType::Wide));
    }

    #[test]
    fn run_out_is_wicket_but_not_bowler_wicket() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "runs": {"batter": 1, "extras": 0, "total": 1},
                "wickets": [{"kind": "run out", "player_out": "c",
                             "fielders": [{"name": "f"}]}]}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert!(event.is_wicket);
        assert!(!event.is_bowler_wicket);
        // Non-striker run out, so the on-strike batter survives.
        assert!(!event.is_batter_out);
        assert_eq!(
            event.wicket.as_ref().and_then(|w| w.fielder.as_deref()),
            Some("f")
        );
    }

    #[test]
    fn retired_hurt_is_not_a_wicket() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "wickets": [{"kind": "retired hurt", "player_out": "a"}]}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert!(!event.is_wicket);
        assert!(!event.is_bowler_wicket);
        assert!(!event.is_batter_out);
        assert_eq!(
            event.wicket.as_ref().map(|w| w.player_out.as_str()),
            Some("a")
        );
    }

    #[test]
    fn caught_batter_is_out() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "wickets": [{"kind": "caught", "player_out": "a",
                             "fielders": [{"name": "f"}]}]}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert!(event.is_wicket);
        assert!(event.is_bowler_wicket);
        assert!(event.is_batter_out);
    }

    #[test]
    fn only_first_dismissal_is_kept() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "wickets": [
                    {"kind": "run out", "player_out": "c"},
                    {"kind": "run out", "player_out": "a"}
                ]}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert_eq!(
            event.wicket.as_ref().map(|w| w.player_out.as_str()),
            Some("c")
        );
        assert!(!event.is_batter_out);
    }

    #[test]
    fn boundary_flags_ignore_bye_assisted_totals() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "runs": {"batter": 0, "extras": 4, "total": 4},
                "extras": {"byes": 4}}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert!(!event.is_boundary);
        assert!(!event.is_four);
        // Byes are not conceded by the bowler, so this still counts as a dot.
        assert!(event.is_legal);
        assert!(event.is_dot);
        assert_eq!(event.extra_type, Some(ExtraType::Bye));
    }

    #[test]
    fn six_off_the_bat() {
        let doc = one_delivery_doc(
            r#"{"batter": "a", "bowler": "b", "non_striker": "c",
                "runs": {"batter": 6, "extras": 0, "total": 6}}"#,
        );
        let event = &extract_ball_events(&doc, "m1")[0];
        assert!(event.is_boundary);
        assert!(event.is_six);
        assert!(!event.is_four);
        assert!(!event.is_dot);
    }

    #[test]
    fn super_over_flag_covers_every_delivery_of_the_innings() {
        let doc = doc(
            r#"{
                "info": {"teams": ["Chennai Super Kings", "Mumbai Indians"]},
                "innings": [{
                    "team": "Mumbai Indians",
                    "super_over": true,
                    "overs": [{"over": 0, "deliveries": [
                        {"batter": "a", "bowler": "b", "non_striker": "c",
                         "runs": {"batter": 1, "extras": 0, "total": 1}},
                        {"batter": "c", "bowler": "b", "non_striker": "a",
                         "runs": {"batter": 0, "extras": 0, "total": 0}}
                    ]}]
                }]
            }"#,
        );
        let events = extract_ball_events(&doc, "m1");
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.is_super_over));
    }

    #[test]
    fn event_ids_follow_traversal_order() {
        let doc = doc(
            r#"{
                "info": {"teams": ["Chennai Super Kings", "Mumbai Indians"]},
                "innings": [
                    {"team": "Chennai Super Kings", "overs": [
                        {"over": 0, "deliveries": [
                            {"batter": "a", "bowler": "b", "non_striker": "c"},
                            {"batter": "a", "bowler": "b", "non_striker": "c"}
                        ]},
                        {"over": 1, "deliveries": [
                            {"batter": "a", "bowler": "d", "non_striker": "c"}
                        ]}
                    ]},
                    {"team": "Mumbai Indians", "target": {"runs": 140}, "overs": [
                        {"over": 0, "deliveries": [
                            {"batter": "x", "bowler": "y", "non_striker": "z"}
                        ]}
                    ]}
                ]
            }"#,
        );
        let events = extract_ball_events(&doc, "m9");
        assert_eq!(
            events.iter().map(|e| e.event_id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(events[3].innings, 2);
        assert_eq!(events[3].target_runs, Some(140));
        assert_eq!(events[3].batting_team, "Mumbai Indians");
        assert_eq!(events[3].bowling_team, "Chennai Super Kings");
        assert_eq!(events[2].ball_id, "m9_1_1.1");
    }
}
