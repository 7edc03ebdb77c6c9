use serde::{Deserialize, Deserializer, Serialize};

/// Win count and eligibility of one contestant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContestantRecord {
    pub count: i64,
    pub excluded: bool,
}

impl ContestantRecord {
    pub fn new(count: i64) -> Self {
        Self { count, excluded: false }
    }
}

// Older state files store the bare count: { "alice": 3 }.
// Newer ones store the record: { "alice": { "count": 3, "excluded": false } }.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Bare(i64),
    Full {
        count: i64,
        #[serde(default)]
        excluded: bool,
    },
}

impl<'de> Deserialize<'de> for ContestantRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RecordRepr::deserialize(deserializer)? {
            RecordRepr::Bare(count) => ContestantRecord::new(count),
            RecordRepr::Full { count, excluded } => ContestantRecord { count, excluded },
        })
    }
}

/// Canonical ledger key for a name: trimmed and lowercased.
/// Returns `None` when nothing is left after trimming.
pub fn normalize(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Presentation form of a key: first letter upper case, the rest lower case.
pub fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Alice "), Some("alice".to_string()));
        assert_eq!(normalize("BOB"), Some("bob".to_string()));
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("alice"), "Alice");
        assert_eq!(display_name("contestant 7"), "Contestant 7");
        assert_eq!(display_name("mCdONALD"), "Mcdonald");
        assert_eq!(display_name("élodie"), "Élodie");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_record_reads_both_layouts() {
        let bare: ContestantRecord = serde_json::from_str("4").expect("bare count");
        assert_eq!(bare, ContestantRecord { count: 4, excluded: false });

        let full: ContestantRecord =
            serde_json::from_str(r#"{"count": -1, "excluded": true}"#).expect("full record");
        assert_eq!(full, ContestantRecord { count: -1, excluded: true });

        let no_flag: ContestantRecord = serde_json::from_str(r#"{"count": 2}"#).expect("flag defaults");
        assert!(!no_flag.excluded);
    }

    #[test]
    fn test_record_writes_full_layout() {
        let json = serde_json::to_string(&ContestantRecord::new(3)).expect("serialize");
        assert_eq!(json, r#"{"count":3,"excluded":false}"#);
    }
}
