use std::collections::HashMap;

use crate::source::MatchDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub full_name: String,
    pub short_name: String,
    pub registry_id: Option<String>,
}

/// Players named in one document's playing elevens, keyed by full name and
/// joined against the document's registry for external ids.
pub fn extract_players(doc: &MatchDocument) -> HashMap<String, PlayerEntry> {
    let registry = &doc.info.registry.people;
    let mut out = HashMap::new();
    for names in doc.info.players.values() {
        for name in names {
            out.insert(
                name.clone(),
                PlayerEntry {
                    full_name: name.clone(),
                    // No separate short form in the source data.
                    short_name: name.clone(),
                    registry_id: registry.get(name).cloned(),
                },
            );
        }
    }
    out
}

/// Merge one document's players into the corpus-wide map. Later documents
/// overwrite earlier ones on registry-id conflicts; the pipeline merges in
/// sorted file order so "later" is well defined.
pub fn merge_players(
    corpus: &mut HashMap<String, PlayerEntry>,
    document: HashMap<String, PlayerEntry>,
) {
    corpus.extend(document);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{extract_players, merge_players};
    use crate::source::MatchDocument;

    fn doc(raw: &str) -> MatchDocument {
        serde_json::from_str(raw).expect("test document should parse")
    }

    #[test]
    fn registry_ids_attach_by_name() {
        let doc = doc(r#"{
            "info": {
                "registry": {"people": {"V Kohli": "ba607b88"}},
                "players": {"Royal Challengers Bengaluru": ["V Kohli", "F du Plessis"]}
            },
            "innings": []
        }"#);
        let players = extract_players(&doc);
        assert_eq!(players.len(), 2);
        assert_eq!(
            players["V Kohli"].registry_id.as_deref(),
            Some("ba607b88")
        );
        assert!(players["F du Plessis"].registry_id.is_none());
    }

    #[test]
    fn last_document_wins_on_conflicting_registry_ids() {
        let first = doc(r#"{
            "info": {
                "registry": {"people": {"V Kohli": "old-id"}},
                "players": {"RCB": ["V Kohli"]}
            },
            "innings": []
        }"#);
        let second = doc(r#"{
            "info": {
                "registry": {"people": {"V Kohli": "new-id"}},
                "players": {"RCB": ["V Kohli"]}
            },
            "innings": []
        }"#);

        let mut corpus = HashMap::new();
        merge_players(&mut corpus, extract_players(&first));
        merge_players(&mut corpus, extract_players(&second));
        assert_eq!(corpus["V Kohli"].registry_id.as_deref(), Some("new-id"));
    }
}
