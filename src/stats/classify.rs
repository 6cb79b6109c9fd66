use crate::records::{PrRecord, PrState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Which side of the team boundary a PR author is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Contributor {
    Internal,
    External,
}

impl Contributor {
    pub fn label(self) -> &'static str {
        match self {
            Contributor::Internal => "Internal",
            Contributor::External => "External",
        }
    }
}

/// Branch filter and team membership shared by every statistic
#[derive(Debug, Clone, Default)]
pub struct TeamScope {
    pub main_branch: String,
    pub internal_members: HashSet<String>,
}

impl TeamScope {
    pub fn new<I, S>(main_branch: impl Into<String>, internal_members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            main_branch: main_branch.into(),
            internal_members: internal_members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classify(&self, record: &PrRecord) -> Contributor {
        if is_external(record, &self.internal_members) {
            Contributor::External
        } else {
            Contributor::Internal
        }
    }

    /// Non-draft PR targeting the main branch
    pub fn counts(&self, record: &PrRecord) -> bool {
        record.branch == self.main_branch && !record.is_draft
    }
}

pub fn is_external(record: &PrRecord, internal_members: &HashSet<String>) -> bool {
    !internal_members.contains(&record.author)
}

/// When the PR stopped being open, or `reference_time` if it still is
pub fn effective_end_date(record: &PrRecord, reference_time: DateTime<Utc>) -> DateTime<Utc> {
    match record.state {
        PrState::Merged => record.merged_at.unwrap_or(reference_time),
        PrState::Closed => record.closed_at.unwrap_or(reference_time),
        PrState::Open => reference_time,
    }
}
