use crate::stats::{AgeBucket, Contributor, WindowReport, WindowStats};
use std::fmt::Write;

/// Buckets shown in the summary table, in row order
const SUMMARY_BUCKETS: [(AgeBucket, &str); 5] = [
    (AgeBucket::Under5, "Open <5 days"),
    (AgeBucket::AtLeast5, "Open ≥5 days"),
    (AgeBucket::AtLeast10, "Open ≥10 days"),
    (AgeBucket::AtLeast20, "Open ≥20 days"),
    (AgeBucket::AtLeast30, "Open ≥30 days"),
];

const CLASSES: [Contributor; 2] = [Contributor::Internal, Contributor::External];

/// Share of `total` as a percentage, 0 when `total` is 0
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Format a count with its share of the class total, e.g. "3 (37.5%)"
pub fn format_share(count: u64, total: u64) -> String {
    format!("{} ({:.1}%)", count, percent(count, total))
}

/// Render trailing-window summaries side by side as one Markdown table.
///
/// `windows` pairs each window length in weeks with its report.
pub fn render_summary_table(windows: &[(u32, WindowReport)]) -> String {
    let mut out = String::new();

    let mut header = String::from("| PRs |");
    let mut rule = String::from("| --- |");
    for (weeks, _) in windows {
        for class in CLASSES {
            let _ = write!(header, " {} ({}w) |", class.label(), weeks);
            rule.push_str(" ---: |");
        }
    }
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", rule);

    let row = |out: &mut String, label: &str, cell: &dyn Fn(&WindowStats) -> String| {
        let mut line = format!("| {} |", label);
        for (_, report) in windows {
            for class in CLASSES {
                let _ = write!(line, " {} |", cell(report.get(class)));
            }
        }
        let _ = writeln!(out, "{}", line);
    };

    row(&mut out, "Total", &|s: &WindowStats| s.count.to_string());
    row(&mut out, "Closed", &|s: &WindowStats| s.closed_count.to_string());
    row(&mut out, "Avg days to close", &|s: &WindowStats| format!("{:.1}", s.avg_days_to_close));
    row(&mut out, "Avg days open", &|s: &WindowStats| format!("{:.1}", s.avg_open_days));
    for (bucket, label) in SUMMARY_BUCKETS {
        row(&mut out, label, &|s: &WindowStats| format_share(s.buckets.get(bucket), s.count));
    }

    out
}
