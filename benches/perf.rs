use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cricsheet_etl::ball_events::extract_ball_events;
use cricsheet_etl::source::MatchDocument;

fn synthetic_match_json() -> String {
    let mut innings = Vec::new();
    for team in ["Chennai Super Kings", "Mumbai Indians"] {
        let mut overs = Vec::new();
        for over in 0..20 {
            let mut deliveries = Vec::new();
            for ball in 0..6 {
                deliveries.push(format!(
                    r#"{{"batter": "Batter {ball}", "bowler": "Bowler {over}",
                        "non_striker": "Runner",
                        "runs": {{"batter": {runs}, "extras": 0, "total": {runs}}}}}"#,
                    runs = (over + ball) % 7
                ));
            }
            overs.push(format!(
                r#"{{"over": {over}, "deliveries": [{}]}}"#,
                deliveries.join(",")
            ));
        }
        innings.push(format!(
            r#"{{"team": "{team}", "overs": [{}]}}"#,
            overs.join(",")
        ));
    }
    format!(
        r#"{{"info": {{"teams": ["Chennai Super Kings", "Mumbai Indians"]}},
            "innings": [{}]}}"#,
        innings.join(",")
    )
}

fn bench_document_parse(c: &mut Criterion) {
    let raw = synthetic_match_json();
    c.bench_function("document_parse", |b| {
        b.iter(|| {
            let doc: MatchDocument = serde_json::from_str(black_box(&raw)).unwrap();
            black_box(doc.innings.len());
        })
    });
}

fn bench_ball_event_extract(c: &mut Criterion) {
    let raw = synthetic_match_json();
    let doc: MatchDocument = serde_json::from_str(&raw).expect("synthetic match should parse");
    c.bench_function("ball_event_extract", |b| {
        b.iter(|| {
            let events = extract_ball_events(black_box(&doc), "bench");
            black_box(events.len());
        })
    });
}

criterion_group!(benches, bench_document_parse, bench_ball_event_extract);
criterion_main!(benches);
