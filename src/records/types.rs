use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column order of the persisted record table
pub const FIELDS: [&str; 14] = [
    "number",
    "state",
    "closed",
    "isDraft",
    "title",
    "branch",
    "createdAt",
    "updatedAt",
    "mergedAt",
    "closedAt",
    "author",
    "assignees",
    "labels",
    "url",
];

/// Width of the zero-padded record key
const KEY_WIDTH: usize = 8;

/// Records keyed by zero-padded PR number, so iteration order is numeric order
pub type RecordMap = BTreeMap<String, PrRecord>;

/// Build the store key for a PR number, e.g. 42 -> "00000042"
pub fn record_key(number: u64) -> String {
    format!("{:0width$}", number, width = KEY_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

impl PrState {
    /// Merged and closed PRs both count as finished
    pub fn is_finished(self) -> bool {
        matches!(self, PrState::Merged | PrState::Closed)
    }
}

/// One pull request as kept in the record store.
///
/// Serde attributes define the persisted column names and cell encodings:
/// flags are `TRUE`/`FALSE`, timestamps are `YYYY-MM-DDTHH:MM:SSZ` (empty when
/// absent) and list fields are comma-joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrRecord {
    pub number: u64,
    pub state: PrState,
    #[serde(with = "flag")]
    pub closed: bool,
    #[serde(with = "flag")]
    pub is_draft: bool,
    pub title: String,
    pub branch: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(with = "optional_timestamp")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(with = "optional_timestamp")]
    pub closed_at: Option<DateTime<Utc>>,
    pub author: String,
    #[serde(with = "joined")]
    pub assignees: Vec<String>,
    #[serde(with = "joined")]
    pub labels: Vec<String>,
    pub url: String,
}

impl PrRecord {
    pub fn key(&self) -> String {
        record_key(self.number)
    }

    pub fn is_open(&self) -> bool {
        self.state == PrState::Open
    }

    /// Column of the end timestamp the state requires but the record lacks
    pub fn missing_end_timestamp(&self) -> Option<&'static str> {
        match self.state {
            PrState::Merged if self.merged_at.is_none() => Some("mergedAt"),
            PrState::Closed if self.closed_at.is_none() => Some("closedAt"),
            _ => None,
        }
    }
}

/// Format used for every persisted timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC, truncated to whole
/// seconds to match the persisted format
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|dt| dt.with_timezone(&Utc).trunc_subsecs(0))
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "TRUE" } else { "FALSE" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(de::Error::custom(format!("invalid flag '{}'", other))),
        }
    }
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_timestamp(dt)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        super::parse_timestamp(&raw)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

mod joined {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.join(","))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }
}
