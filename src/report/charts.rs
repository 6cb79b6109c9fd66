//! Trend charts rendered as quickchart.io image links.
//!
//! Each chart is a Chart.js line-chart config written in the relaxed
//! object-literal syntax quickchart accepts, URL-encoded into the `c` query
//! parameter.

use super::summary::percent;
use crate::stats::{AgeBucket, PeriodStats, WindowStats};
use std::fmt::Write;

const QUICKCHART_URL: &str = "https://quickchart.io/chart";

const AREA_STYLE: &str = "lineTension:0.2,fill:true,borderColor:'#003366',backgroundColor:'#FFCC00'";
const OPEN_STYLE: &str = "lineTension:0.2,fill:true,borderColor:'#FDD20EFF',backgroundColor:'#FDD20E99'";
const CLOSED_STYLE: &str = "lineTension:0.2,fill:true,borderColor:'#006400',backgroundColor:'#32CD32'";
const INTERNAL_STYLE: &str = "lineTension:0.4,fill:false,borderColor:'#00539CFF',backgroundColor:'#00539CFF'";
const EXTERNAL_STYLE: &str = "lineTension:0.4,fill:false,borderColor:'#97BC62FF',backgroundColor:'#97BC62FF'";
const CLOSE_RATE_STYLES: [&str; 3] = [
    "pointRadius:1,borderWidth:2,lineTension:0,fill:true,borderColor:'#4CAF50FF',backgroundColor:'#77DD77FF'",
    "pointRadius:1,borderWidth:2,lineTension:0,fill:true,borderColor:'#99CC99FF',backgroundColor:'#CCFFCCFF'",
    "pointRadius:1,borderWidth:2,lineTension:0,fill:true,borderColor:'#999999FF',backgroundColor:'#CCCCCC99'",
];

/// One line of a chart
pub struct Dataset {
    pub label: String,
    pub values: Vec<String>,
    pub style: &'static str,
}

impl Dataset {
    fn new(label: &str, values: Vec<String>, style: &'static str) -> Self {
        Self {
            label: label.to_string(),
            values,
            style,
        }
    }
}

/// Build the Chart.js line-chart config for `labels` and `datasets`
pub fn line_chart_config(labels: &[String], datasets: &[Dataset]) -> String {
    let labels = labels
        .iter()
        .map(|l| format!("'{}'", l))
        .collect::<Vec<_>>()
        .join(",");
    let datasets = datasets
        .iter()
        .map(|d| format!("{{label:'{}',data:[{}],{}}}", d.label, d.values.join(","), d.style))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{type:'line',data:{{labels:[{}],datasets:[{}]}}}}", labels, datasets)
}

/// Image URL rendering `config`
pub fn chart_url(config: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(config.as_bytes()).collect();
    format!("{}?c={}", QUICKCHART_URL, encoded)
}

fn chart_image(labels: &[String], datasets: &[Dataset]) -> String {
    format!("![stats]({})", chart_url(&line_chart_config(labels, datasets)))
}

/// Periods oldest first, as charts read left to right
fn chronological(periods: &[PeriodStats]) -> Vec<&PeriodStats> {
    periods.iter().rev().collect()
}

fn date_labels(periods: &[&PeriodStats]) -> Vec<String> {
    periods
        .iter()
        .map(|p| p.label.format("%Y-%m-%d").to_string())
        .collect()
}

fn series<F>(periods: &[&PeriodStats], value: F) -> Vec<String>
where
    F: Fn(&WindowStats, &PeriodStats) -> String,
{
    periods
        .iter()
        .map(|p| value(&p.report.total(), *p))
        .collect()
}

fn section(out: &mut String, heading: &str, description: Option<&str>, image: String) {
    let _ = writeln!(out, "## {}\n", heading);
    if let Some(description) = description {
        let _ = writeln!(out, "{}\n", description);
    }
    let _ = writeln!(out, "{}\n", image);
}

/// Render every trend chart section. `periods` are newest first, as
/// returned by the rollup.
pub fn render_charts(periods: &[PeriodStats], span_days: u32) -> String {
    let ordered = chronological(periods);
    let labels = date_labels(&ordered);
    let span = format!("last {} days", span_days);
    let mut out = String::new();

    let over_five = series(&ordered, |s, _| s.buckets.get(AgeBucket::AtLeast5).to_string());
    section(
        &mut out,
        &format!("PRs open 5 days or more, {}", span),
        None,
        chart_image(&labels, &[Dataset::new("open PRs", over_five, AREA_STYLE)]),
    );

    let to_close = series(&ordered, |s, _| format!("{:.2}", s.avg_days_to_close));
    section(
        &mut out,
        &format!("Avg time to close a PR, {}", span),
        Some("Stats about the PRs that have been merged or closed."),
        chart_image(&labels, &[Dataset::new("days", to_close, AREA_STYLE)]),
    );

    let open_days = series(&ordered, |s, _| format!("{:.2}", s.avg_open_days));
    section(
        &mut out,
        &format!("Avg time a PR stays open, {}", span),
        Some("Stats about all the PRs, merged, closed and still open."),
        chart_image(&labels, &[Dataset::new("days", open_days, AREA_STYLE)]),
    );

    let open = series(&ordered, |s, _| s.count.to_string());
    let closed = series(&ordered, |s, _| s.closed_count.to_string());
    section(
        &mut out,
        &format!("PRs open and closed, {}", span),
        None,
        chart_image(
            &labels,
            &[
                Dataset::new("open", open, OPEN_STYLE),
                Dataset::new("merged+closed", closed, CLOSED_STYLE),
            ],
        ),
    );

    let (cumulative_open, cumulative_closed) = cumulative_counts(&ordered);
    section(
        &mut out,
        &format!("PRs open and closed, cumulative, {}", span),
        None,
        chart_image(
            &labels,
            &[
                Dataset::new("open", cumulative_open, OPEN_STYLE),
                Dataset::new("merged+closed", cumulative_closed, CLOSED_STYLE),
            ],
        ),
    );

    let rates: Vec<Dataset> = [AgeBucket::Under5, AgeBucket::Under10, AgeBucket::Under15]
        .into_iter()
        .zip(CLOSE_RATE_STYLES)
        .map(|(bucket, style)| {
            let values = series(&ordered, |s, _| {
                format!("{:.1}", percent(s.buckets.get(bucket), s.count))
            });
            Dataset::new(&format!("{} days", bucket.label()), values, style)
        })
        .collect();
    section(
        &mut out,
        &format!("% PRs closed in <5 | <10 | <15 days, {}", span),
        None,
        chart_image(&labels, &rates),
    );

    let internal = series(&ordered, |s, p| {
        format!("{:.1}", percent(p.report.internal.count, s.count))
    });
    let external = series(&ordered, |s, p| {
        format!("{:.1}", percent(p.report.external.count, s.count))
    });
    section(
        &mut out,
        &format!("Internal and External PRs %, {}", span),
        None,
        chart_image(
            &labels,
            &[
                Dataset::new("% internal", internal, INTERNAL_STYLE),
                Dataset::new("% external", external, EXTERNAL_STYLE),
            ],
        ),
    );

    out
}

/// Running totals of PR and closed counts, oldest period first
fn cumulative_counts(periods: &[&PeriodStats]) -> (Vec<String>, Vec<String>) {
    let mut open_total = 0u64;
    let mut closed_total = 0u64;
    periods
        .iter()
        .map(|p| {
            let total = p.report.total();
            open_total += total.count;
            closed_total += total.closed_count;
            (open_total.to_string(), closed_total.to_string())
        })
        .unzip()
}
