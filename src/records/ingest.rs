use super::error::StoreError;
use super::types::{parse_timestamp, PrRecord, PrState};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A PR object as produced by `gh pr list --json ...`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPr {
    number: u64,
    state: String,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    is_draft: bool,
    #[serde(default)]
    title: String,
    base_ref_name: String,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    merged_at: Option<String>,
    #[serde(default)]
    closed_at: Option<String>,
    author: Login,
    #[serde(default)]
    assignees: Vec<Login>,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct Login {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

/// Read a snapshot file and convert every entry into a record.
///
/// Any malformed entry fails the whole batch.
pub fn read_snapshot(path: &Path) -> Result<Vec<PrRecord>, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    parse_snapshot(&content, &path.display().to_string())
}

/// Parse snapshot JSON text. `source` names the input in error messages.
pub fn parse_snapshot(json: &str, source: &str) -> Result<Vec<PrRecord>, StoreError> {
    let entries: Vec<Value> = serde_json::from_str(json).map_err(|e| StoreError::Snapshot {
        path: source.to_string(),
        source: e,
    })?;

    let records = entries
        .into_iter()
        .map(convert_entry)
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} PRs from snapshot {}", records.len(), source);
    Ok(records)
}

fn convert_entry(entry: Value) -> Result<PrRecord, StoreError> {
    let number = entry.get("number").and_then(Value::as_u64).unwrap_or_default();
    let pr: SnapshotPr = serde_json::from_value(entry).map_err(|e| StoreError::MalformedRecord {
        number,
        reason: e.to_string(),
    })?;
    convert(pr)
}

fn convert(pr: SnapshotPr) -> Result<PrRecord, StoreError> {
    let number = pr.number;
    let malformed = |reason: String| StoreError::MalformedRecord { number, reason };

    if number == 0 {
        return Err(malformed("PR number must be positive".to_string()));
    }

    let state = match pr.state.trim().to_ascii_uppercase().as_str() {
        "OPEN" => PrState::Open,
        "MERGED" => PrState::Merged,
        "CLOSED" => PrState::Closed,
        other => return Err(malformed(format!("unknown state '{}'", other))),
    };

    let created_at = required_timestamp("createdAt", &pr.created_at).map_err(malformed)?;
    let updated_at = required_timestamp("updatedAt", &pr.updated_at).map_err(malformed)?;
    let merged_at = optional_timestamp("mergedAt", pr.merged_at.as_deref()).map_err(malformed)?;
    let closed_at = optional_timestamp("closedAt", pr.closed_at.as_deref()).map_err(malformed)?;

    match state {
        PrState::Merged if merged_at.is_none() => {
            return Err(malformed("state is MERGED but mergedAt is missing".to_string()))
        }
        PrState::Closed if closed_at.is_none() => {
            return Err(malformed("state is CLOSED but closedAt is missing".to_string()))
        }
        _ => {}
    }

    if pr.author.login.trim().is_empty() {
        return Err(malformed("author login is empty".to_string()));
    }

    Ok(PrRecord {
        number,
        state,
        closed: pr.closed,
        is_draft: pr.is_draft,
        title: pr.title,
        branch: pr.base_ref_name,
        created_at,
        updated_at,
        merged_at,
        closed_at,
        author: pr.author.login,
        assignees: pr.assignees.into_iter().map(|a| a.login).collect(),
        labels: pr.labels.into_iter().map(|l| l.name).collect(),
        url: pr.url,
    })
}

fn required_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, String> {
    optional_timestamp(field, Some(value))?.ok_or_else(|| format!("{} is missing", field))
}

/// Null, empty and GitHub's zero date (year 1) all mean "not set"
fn optional_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let parsed = parse_timestamp(raw).map_err(|e| format!("{} '{}' is invalid: {}", field, raw, e))?;
    if parsed.year() <= 1 {
        return Ok(None);
    }
    Ok(Some(parsed))
}
