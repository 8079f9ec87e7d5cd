use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One chart as returned by the search API.
///
/// `chart_id` is globally unique. `song_id` links alternative charts of the
/// same song and is absent for charts that were never matched to a song.
/// Display fields the engine does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub chart_id: i64,
    pub song_id: Option<i64>,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub charter: Option<String>,
    /// Song length in milliseconds.
    #[serde(rename = "song_length")]
    pub song_length: Option<u64>,
    pub modified_time: Option<String>,
    pub md5: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartEntry {
    /// Bare entry with only identifiers set.
    pub fn new(chart_id: i64, song_id: Option<i64>) -> Self {
        Self {
            chart_id,
            song_id,
            name: None,
            artist: None,
            album: None,
            genre: None,
            year: None,
            charter: None,
            song_length: None,
            modified_time: None,
            md5: None,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_display_fields_are_kept() {
        let raw = r#"{
            "chartId": 7,
            "songId": null,
            "name": "Megalovania",
            "artist": "Toby Fox",
            "song_length": 156000,
            "modifiedTime": "2024-01-02T03:04:05Z",
            "diff_guitar": 6,
            "icon": "toby"
        }"#;
        let entry: ChartEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.chart_id, 7);
        assert_eq!(entry.song_id, None);
        assert_eq!(entry.song_length, Some(156000));
        assert_eq!(entry.extra.get("diff_guitar"), Some(&Value::from(6)));
        assert_eq!(entry.extra.get("icon"), Some(&Value::from("toby")));
    }

    #[test]
    fn chart_id_is_required() {
        let raw = r#"{ "songId": 3, "name": "x" }"#;
        assert!(serde_json::from_str::<ChartEntry>(raw).is_err());
    }
}
