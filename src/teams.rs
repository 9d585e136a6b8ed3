use std::collections::HashMap;

use once_cell::sync::Lazy;

// Historical franchise renames. Every name must pass through here before any
// id or abbreviation lookup, otherwise renamed teams split into two identities.
static CANONICAL_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Delhi Daredevils", "Delhi Capitals"),
        ("Kings XI Punjab", "Punjab Kings"),
        ("Royal Challengers Bangalore", "Royal Challengers Bengaluru"),
        // Spelling variation, not a rename.
        ("Rising Pune Supergiants", "Rising Pune Supergiant"),
    ])
});

static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Chennai Super Kings", "CSK"),
        ("Mumbai Indians", "MI"),
        ("Royal Challengers Bengaluru", "RCB"),
        ("Royal Challengers Bangalore", "RCB"),
        ("Kolkata Knight Riders", "KKR"),
        ("Delhi Capitals", "DC"),
        ("Punjab Kings", "PBKS"),
        ("Rajasthan Royals", "RR"),
        ("Sunrisers Hyderabad", "SRH"),
        ("Gujarat Titans", "GT"),
        ("Lucknow Super Giants", "LSG"),
        // Defunct franchises still present in older seasons.
        ("Deccan Chargers", "DCH"),
        ("Kochi Tuskers Kerala", "KTK"),
        ("Pune Warriors India", "PWI"),
        ("Rising Pune Supergiant", "RPS"),
        ("Gujarat Lions", "GL"),
    ])
});

/// Map a team name as it appears in a source document to its current
/// canonical franchise name.
pub fn canonical_team_name(name: &str) -> String {
    CANONICAL_NAMES
        .get(name)
        .map(|s| (*s).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Standard abbreviation for a team; unknown teams fall back to the first
/// three letters upper-cased.
pub fn team_abbreviation(team_name: &str) -> String {
    if let Some(abbrev) = ABBREVIATIONS.get(team_name) {
        return (*abbrev).to_string();
    }
    team_name.chars().take(3).collect::<String>().to_uppercase()
}

/// Stable team id: lower-cased abbreviation of the canonical name.
pub fn team_id(team_name: &str) -> String {
    let canonical = canonical_team_name(team_name);
    team_abbreviation(&canonical).to_lowercase()
}
