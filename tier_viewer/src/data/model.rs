// Store-agnostic player records.
// HTTP and fixture decoding both land here; ranking only reads these.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `players` table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub ign: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tier: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gamemode: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PlayerRecord {
    pub fn new(ign: impl Into<String>, tier: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            ign: ign.into(),
            tier: tier.into(),
            region: region.into(),
            gamemode: String::new(),
        }
    }

    /// Lowercase, trimmed form used for every comparison.
    pub fn canonical_ign(&self) -> String {
        self.ign.trim().to_lowercase()
    }

    /// IGN with its first letter uppercased, as the skin endpoint expects.
    pub fn skin_key(&self) -> String {
        skin_key(&self.ign)
    }

    pub fn region(&self) -> Region {
        Region::parse(&self.region)
    }

    pub fn is_retired(&self) -> bool {
        self.tier.trim().starts_with(['R', 'r'])
    }
}

/// Uppercases the first character of a trimmed IGN and keeps the rest as typed.
pub fn skin_key(ign: &str) -> String {
    let trimmed = ign.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Regions with their own badge colour; everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Asia,
    Europe,
    Other,
}

impl Region {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "as" => Region::Asia,
            "eu" => Region::Europe,
            _ => Region::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skin_key_uppercases_only_first_letter() {
        assert_eq!(skin_key("steve"), "Steve");
        assert_eq!(skin_key(" pojavXcpvp "), "PojavXcpvp");
        assert_eq!(skin_key("_ahaz3m"), "_ahaz3m");
        assert_eq!(skin_key(""), "");
    }

    #[test]
    fn retired_marker_is_case_insensitive() {
        assert!(PlayerRecord::new("carl", "R5", "eu").is_retired());
        assert!(PlayerRecord::new("carl", "rHT1", "eu").is_retired());
        assert!(!PlayerRecord::new("carl", "HT1", "eu").is_retired());
    }

    #[test]
    fn region_parsing() {
        assert_eq!(Region::parse("AS"), Region::Asia);
        assert_eq!(Region::parse("eu"), Region::Europe);
        assert_eq!(Region::parse("na"), Region::Other);
        assert_eq!(Region::parse(""), Region::Other);
    }

    #[test]
    fn missing_optional_fields_deserialize_empty() {
        let record: PlayerRecord =
            serde_json::from_str(r#"{"ign":"Alice","tier":"HT1","id":7}"#).unwrap();
        assert_eq!(record.region, "");
        assert_eq!(record.gamemode, "");

        let record: PlayerRecord =
            serde_json::from_str(r#"{"ign":"Bob","tier":"LT1","region":null}"#).unwrap();
        assert_eq!(record.region, "");
    }
}
