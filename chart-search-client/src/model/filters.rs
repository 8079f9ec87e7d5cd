//! Filter vocabulary understood by the search API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Instrument track a chart must contain.
///
/// The API filters by one instrument per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Guitar,
    GuitarCoop,
    Rhythm,
    Bass,
    Drums,
    Keys,
    GuitarGhl,
    GuitarCoopGhl,
    RhythmGhl,
    BassGhl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Expert,
    Hard,
    Medium,
    Easy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrumType {
    FourLane,
    FourLanePro,
    FiveLane,
}

/// Column the API sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    Artist,
    Album,
    Genre,
    Year,
    Charter,
    Length,
    ModifiedTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort order, serialized as `{ "type": <column>, "direction": "asc" | "desc" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "type")]
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// Filters that apply to every search regardless of the query text.
///
/// These are the remembered UI preferences; the caller passes them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub difficulty: Option<Difficulty>,
    pub drum_type: Option<DrumType>,
    pub drums_reviewed: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            difficulty: None,
            drum_type: None,
            drums_reviewed: true,
        }
    }
}

/// Match rule for one text field of an advanced search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFilter {
    pub value: String,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub exclude: bool,
}

impl TextFilter {
    /// Fuzzy, inclusive match on `value`.
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: false,
            exclude: false,
        }
    }
}

/// Structured search sent to `/search/advanced`.
///
/// Instruments, common filters, and sort order live on the request itself;
/// this type carries only the field-level criteria. Unknown criteria are
/// forwarded untouched through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charter: Option<TextFilter>,
    /// Minimum song length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    /// Maximum song length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
