use super::buckets::BucketCounts;
use super::classify::{effective_end_date, Contributor, TeamScope};
use crate::records::PrRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Evaluation period. A PR overlaps it when it ended at or after `start`
/// and was created before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Statistics for one contributor class over one window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowStats {
    pub count: u64,
    pub closed_count: u64,
    pub avg_open_days: f64,
    pub avg_days_to_close: f64,
    pub buckets: BucketCounts,
}

impl WindowStats {
    /// Merge two results, weighting the averages by their counts
    pub fn combine(&self, other: &WindowStats) -> WindowStats {
        let count = self.count + other.count;
        let closed_count = self.closed_count + other.closed_count;
        let open_days =
            self.avg_open_days * self.count as f64 + other.avg_open_days * other.count as f64;
        let close_days = self.avg_days_to_close * self.closed_count as f64
            + other.avg_days_to_close * other.closed_count as f64;

        WindowStats {
            count,
            closed_count,
            avg_open_days: average(open_days, count),
            avg_days_to_close: average(close_days, closed_count),
            buckets: self.buckets.combine(&other.buckets),
        }
    }
}

/// Internal and external statistics for the same window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub window: Window,
    pub internal: WindowStats,
    pub external: WindowStats,
}

impl WindowReport {
    pub fn get(&self, contributor: Contributor) -> &WindowStats {
        match contributor {
            Contributor::Internal => &self.internal,
            Contributor::External => &self.external,
        }
    }

    pub fn total(&self) -> WindowStats {
        self.internal.combine(&self.external)
    }
}

fn average(total: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Whole days between two instants, partial days rounded up, never negative
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let seconds = (to - from).num_seconds();
    if seconds <= 0 {
        0
    } else {
        ((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY) as u64
    }
}

/// Compute statistics for one contributor class over `window`.
///
/// Only non-draft PRs targeting the main branch that overlap the window are
/// counted. Age is measured up to the PR's end or the window end, whichever
/// comes first.
pub fn aggregate<'a, I>(
    records: I,
    scope: &TeamScope,
    window: Window,
    contributor: Contributor,
) -> WindowStats
where
    I: IntoIterator<Item = &'a PrRecord>,
{
    let mut stats = WindowStats::default();
    let mut total_open_days = 0u64;
    let mut total_days_to_close = 0u64;

    for record in records {
        if scope.classify(record) != contributor || !scope.counts(record) {
            continue;
        }

        let pr_end = effective_end_date(record, window.end);
        if pr_end < window.start || record.created_at >= window.end {
            continue;
        }

        let days_open = days_between(record.created_at, pr_end.min(window.end));
        stats.count += 1;
        total_open_days += days_open;
        stats.buckets.record(days_open);

        if record.state.is_finished() && pr_end <= window.end {
            stats.closed_count += 1;
            total_days_to_close += days_open;
        }
    }

    stats.avg_open_days = average(total_open_days as f64, stats.count);
    stats.avg_days_to_close = average(total_days_to_close as f64, stats.closed_count);
    stats
}

/// Run [`aggregate`] for both contributor classes
pub fn aggregate_window<'a, I>(records: I, scope: &TeamScope, window: Window) -> WindowReport
where
    I: IntoIterator<Item = &'a PrRecord> + Clone,
{
    WindowReport {
        window,
        internal: aggregate(records.clone(), scope, window, Contributor::Internal),
        external: aggregate(records, scope, window, Contributor::External),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{at, merged_record, open_record};
    use crate::records::PrState;
    use crate::stats::buckets::AgeBucket;
    use chrono::{Duration, TimeZone};

    fn scope() -> TeamScope {
        TeamScope::new("main", ["alice", "bob"])
    }

    #[test]
    fn test_days_between_rounds_up() {
        let start = at(2024, 1, 1);
        assert_eq!(days_between(start, start), 0);
        assert_eq!(days_between(start, start + Duration::seconds(1)), 1);
        assert_eq!(days_between(start, start + Duration::days(2)), 2);
        assert_eq!(days_between(start, start + Duration::hours(49)), 3);
        assert_eq!(days_between(start, start - Duration::days(1)), 0);
    }

    #[test]
    fn test_single_merged_internal_pr() {
        let records = vec![merged_record(1, "alice")];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 10));

        let report = aggregate_window(&records, &scope(), window);

        let internal = &report.internal;
        assert_eq!(internal.count, 1);
        assert_eq!(internal.closed_count, 1);
        assert_eq!(internal.avg_open_days, 2.0);
        assert_eq!(internal.avg_days_to_close, 2.0);
        assert_eq!(internal.buckets.get(AgeBucket::Under5), 1);
        assert_eq!(internal.buckets.get(AgeBucket::Under10), 1);
        assert_eq!(internal.buckets.get(AgeBucket::Under15), 1);
        assert_eq!(internal.buckets.get(AgeBucket::AtLeast5), 0);
        assert_eq!(report.external, WindowStats::default());
    }

    #[test]
    fn test_draft_is_excluded() {
        let mut draft = merged_record(1, "alice");
        draft.is_draft = true;
        let records = vec![draft];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 10));

        let report = aggregate_window(&records, &scope(), window);
        assert_eq!(report.internal.count, 0);
        assert_eq!(report.external.count, 0);
    }

    #[test]
    fn test_other_branch_is_excluded() {
        let mut record = merged_record(1, "alice");
        record.branch = "release/1.0".to_string();
        let records = vec![record];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 10));

        assert_eq!(aggregate_window(&records, &scope(), window).internal.count, 0);
    }

    #[test]
    fn test_old_open_pr_hits_every_at_least_bucket() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut record = open_record(1, "mallory");
        record.created_at = reference - Duration::days(35);
        let records = vec![record];
        let window = Window::new(reference - Duration::days(7), reference);

        let external = aggregate(&records, &scope(), window, Contributor::External);

        assert_eq!(external.count, 1);
        assert_eq!(external.closed_count, 0);
        assert_eq!(external.avg_open_days, 35.0);
        assert_eq!(external.avg_days_to_close, 0.0);
        for bucket in [
            AgeBucket::AtLeast5,
            AgeBucket::AtLeast10,
            AgeBucket::AtLeast15,
            AgeBucket::AtLeast20,
            AgeBucket::AtLeast30,
        ] {
            assert_eq!(external.buckets.get(bucket), 1, "bucket {}", bucket.label());
        }
        assert_eq!(external.buckets.get(AgeBucket::Under15), 0);
    }

    #[test]
    fn test_empty_records_yield_zero_stats() {
        let records: Vec<PrRecord> = vec![];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 8));

        let report = aggregate_window(&records, &scope(), window);
        assert_eq!(report.internal, WindowStats::default());
        assert_eq!(report.external, WindowStats::default());
        assert_eq!(report.total().avg_open_days, 0.0);
    }

    #[test]
    fn test_end_on_window_start_is_included() {
        let mut record = merged_record(1, "alice");
        record.created_at = at(2023, 12, 28);
        record.merged_at = Some(at(2024, 1, 1));
        let records = vec![record];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 8));

        let internal = aggregate(&records, &scope(), window, Contributor::Internal);
        assert_eq!(internal.count, 1);
        assert_eq!(internal.closed_count, 1);
        assert_eq!(internal.avg_days_to_close, 4.0);
    }

    #[test]
    fn test_end_before_window_start_is_excluded() {
        let mut record = merged_record(1, "alice");
        record.created_at = at(2023, 12, 28);
        record.merged_at = Some(at(2024, 1, 1) - Duration::seconds(1));
        let records = vec![record];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 8));

        assert_eq!(aggregate(&records, &scope(), window, Contributor::Internal).count, 0);
    }

    #[test]
    fn test_created_at_window_end_is_excluded() {
        let mut record = open_record(1, "alice");
        record.created_at = at(2024, 1, 8);
        let records = vec![record];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 8));

        assert_eq!(aggregate(&records, &scope(), window, Contributor::Internal).count, 0);
    }

    #[test]
    fn test_pr_closed_after_window_counts_as_open() {
        let mut record = merged_record(1, "alice");
        record.created_at = at(2024, 1, 1);
        record.merged_at = Some(at(2024, 1, 20));
        let records = vec![record];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 8));

        let internal = aggregate(&records, &scope(), window, Contributor::Internal);
        assert_eq!(internal.count, 1);
        assert_eq!(internal.closed_count, 0);
        assert_eq!(internal.avg_open_days, 7.0);
        assert_eq!(internal.buckets.get(AgeBucket::AtLeast5), 1);
    }

    #[test]
    fn test_averages_over_several_prs() {
        let mut closed = open_record(1, "alice");
        closed.state = PrState::Closed;
        closed.closed_at = Some(at(2024, 1, 5));
        let open = open_record(2, "bob");
        let records = vec![closed, open];
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 11));

        let internal = aggregate(&records, &scope(), window, Contributor::Internal);
        assert_eq!(internal.count, 2);
        assert_eq!(internal.closed_count, 1);
        assert_eq!(internal.avg_open_days, 7.0); // (4 + 10) / 2
        assert_eq!(internal.avg_days_to_close, 4.0);
    }

    #[test]
    fn test_classes_partition_filtered_records() {
        let mut records = vec![
            merged_record(1, "alice"),
            open_record(2, "mallory"),
            open_record(3, "bob"),
            open_record(4, "eve"),
        ];
        records[3].is_draft = true;
        let window = Window::new(at(2024, 1, 1), at(2024, 1, 10));
        let scope = scope();

        let report = aggregate_window(&records, &scope, window);
        let passing = records.iter().filter(|r| scope.counts(r)).count() as u64;
        assert_eq!(report.internal.count + report.external.count, passing);
        assert_eq!(report.internal.count, 2);
        assert_eq!(report.external.count, 1);
    }

    #[test]
    fn test_combine_weights_averages() {
        let a = WindowStats {
            count: 1,
            closed_count: 1,
            avg_open_days: 2.0,
            avg_days_to_close: 2.0,
            buckets: BucketCounts::default(),
        };
        let b = WindowStats {
            count: 3,
            closed_count: 0,
            avg_open_days: 6.0,
            avg_days_to_close: 0.0,
            buckets: BucketCounts::default(),
        };

        let combined = a.combine(&b);
        assert_eq!(combined.count, 4);
        assert_eq!(combined.closed_count, 1);
        assert_eq!(combined.avg_open_days, 5.0);
        assert_eq!(combined.avg_days_to_close, 2.0);
    }
}
