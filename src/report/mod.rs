pub mod charts;
pub mod lists;
pub mod summary;

pub use charts::{chart_url, line_chart_config, render_charts};
pub use lists::{render_slow_prs, render_unassigned_prs, slow_prs, unassigned_prs};
pub use summary::{format_share, percent, render_summary_table};

use crate::config::ReportConfig;
use crate::records::PrRecord;
use crate::stats::{rollup, trailing_summary, Contributor, TeamScope};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use tracing::debug;

/// Render the full Markdown report as of `now`
pub fn render_report(
    records: &[PrRecord],
    scope: &TeamScope,
    settings: &ReportConfig,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", settings.title);
    let _ = writeln!(out, "Last update: {}\n", now.format("%Y-%m-%d %H:%M:%S UTC"));

    let windows: Vec<_> = settings
        .summary_weeks
        .iter()
        .map(|&weeks| (weeks, trailing_summary(records, scope, now, weeks)))
        .collect();
    let _ = writeln!(out, "## PR summary\n");
    let _ = writeln!(out, "{}", render_summary_table(&windows));

    let periods = rollup(records, scope, now, settings.span_days, settings.step_days);
    out.push_str(&render_charts(&periods, settings.span_days));

    for contributor in [Contributor::External, Contributor::Internal] {
        let slow = slow_prs(records, scope, now, settings.slow_pr_days, contributor);
        debug!("{} slow {} PRs", slow.len(), contributor.label().to_lowercase());
        out.push_str(&render_slow_prs(&slow, contributor, settings.slow_pr_days, now));
    }

    out.push_str(&render_unassigned_prs(&unassigned_prs(records, scope)));

    out
}
