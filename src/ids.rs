use sha2::{Digest, Sha256};

// 12 hex digits (48 bits) keeps ids short while leaving collision odds
// negligible at corpus scale; the source system used a 5-digit modulus.
const ID_HEX_LEN: usize = 12;

fn stable_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(ID_HEX_LEN);
    for byte in digest.iter().take(ID_HEX_LEN / 2) {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Stable venue id derived from the venue name only.
pub fn venue_id(venue_name: &str) -> String {
    format!("venue_{}", stable_hash(venue_name))
}

/// Fallback player id for players missing an external registry id.
pub fn fallback_player_id(full_name: &str) -> String {
    format!("player_{}", stable_hash(full_name))
}

/// Season slug used as the season dimension key ("IPL 2021" -> "ipl_2021").
pub fn season_id(season_name: &str) -> String {
    season_name.to_lowercase().replace(' ', "_")
}
