use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Governmental tier imposing an obligation.
///
/// Unrecognized levels are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JurisdictionLevel {
    Federal,
    State,
    County,
    Municipality,
    Other(String),
}

impl JurisdictionLevel {
    /// Fixed order in which the backend groups are merged.
    pub const GROUPS: [JurisdictionLevel; 4] = [
        JurisdictionLevel::Federal,
        JurisdictionLevel::State,
        JurisdictionLevel::County,
        JurisdictionLevel::Municipality,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Federal => "federal",
            Self::State => "state",
            Self::County => "county",
            Self::Municipality => "municipality",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for JurisdictionLevel {
    fn from(value: &str) -> Self {
        match value {
            "federal" => Self::Federal,
            "state" => Self::State,
            "county" => Self::County,
            "municipality" | "municipal" => Self::Municipality,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for JurisdictionLevel {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<JurisdictionLevel> for String {
    fn from(value: JurisdictionLevel) -> Self {
        match value {
            JurisdictionLevel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JurisdictionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: i64,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub jurisdiction_level: JurisdictionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_sources")]
    pub sources: Vec<String>,
}

impl Obligation {
    /// Calendar date of `due_date`, reading only its leading `YYYY-MM-DD`.
    pub fn due_date_value(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_calendar_date)
    }
}

/// Parses the leading `YYYY-MM-DD` of a date or datetime string.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn deserialize_sources<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(url) => Some(url),
            Value::Object(map) => ["url", "href", "link"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string),
            _ => None,
        })
        .filter(|url| !url.trim().is_empty())
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationsResponse {
    #[serde(default)]
    pub federal: Vec<Obligation>,
    #[serde(default)]
    pub state: Vec<Obligation>,
    #[serde(default)]
    pub county: Vec<Obligation>,
    #[serde(default)]
    pub municipality: Vec<Obligation>,
}

impl ObligationsResponse {
    pub fn group(&self, level: &JurisdictionLevel) -> &[Obligation] {
        match level {
            JurisdictionLevel::Federal => &self.federal,
            JurisdictionLevel::State => &self.state,
            JurisdictionLevel::County => &self.county,
            JurisdictionLevel::Municipality => &self.municipality,
            JurisdictionLevel::Other(_) => &[],
        }
    }

    pub fn total(&self) -> usize {
        self.federal.len() + self.state.len() + self.county.len() + self.municipality.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountySummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obligations_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    State,
    County,
    City,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMatch {
    #[serde(rename = "type")]
    pub kind: LocationKind,
    /// State code the match belongs to.
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    pub display: String,
    #[serde(default)]
    pub count: u64,
}
