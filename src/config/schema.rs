use crate::stats::{TeamScope, DEFAULT_SPAN_DAYS, DEFAULT_STEP_DAYS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// main_branch: main
/// record_store: prs.csv
/// snapshot: prs.json
/// internal_members: [alice, bob]
/// report:
///   title: PR stats
///   slow_pr_days: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Only PRs targeting this branch are counted
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// CSV table holding every PR seen so far
    #[serde(default = "default_record_store")]
    pub record_store: PathBuf,

    /// JSON snapshot produced by `gh pr list --json ...`
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,

    /// Logins of team members; everyone else is an external contributor
    #[serde(default)]
    pub internal_members: Vec<String>,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Report layout settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Days covered by the trend charts
    #[serde(default = "default_span_days")]
    pub span_days: u32,

    /// Width of each trend chart window in days
    #[serde(default = "default_step_days")]
    pub step_days: u32,

    /// Trailing windows shown in the summary table, in weeks
    #[serde(default = "default_summary_weeks")]
    pub summary_weeks: Vec<u32>,

    /// Open PRs older than this many days are listed individually
    #[serde(default = "default_slow_pr_days")]
    pub slow_pr_days: u32,
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_record_store() -> PathBuf {
    PathBuf::from("prs.csv")
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("prs.json")
}

fn default_title() -> String {
    "PR stats".to_string()
}

fn default_span_days() -> u32 {
    DEFAULT_SPAN_DAYS
}

fn default_step_days() -> u32 {
    DEFAULT_STEP_DAYS
}

fn default_summary_weeks() -> Vec<u32> {
    vec![2, 4, 8]
}

fn default_slow_pr_days() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_branch: default_main_branch(),
            record_store: default_record_store(),
            snapshot: default_snapshot(),
            internal_members: Vec::new(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            span_days: default_span_days(),
            step_days: default_step_days(),
            summary_weeks: default_summary_weeks(),
            slow_pr_days: default_slow_pr_days(),
        }
    }
}

impl Config {
    pub fn scope(&self) -> TeamScope {
        TeamScope::new(self.main_branch.clone(), self.internal_members.iter().cloned())
    }

    /// Make relative file paths relative to `base` (the config file's directory)
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.record_store.is_relative() {
            self.record_store = base.join(&self.record_store);
        }
        if self.snapshot.is_relative() {
            self.snapshot = base.join(&self.snapshot);
        }
    }
}
