use super::classify::TeamScope;
use super::window::{aggregate_window, Window, WindowReport};
use crate::records::PrRecord;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

pub const DEFAULT_SPAN_DAYS: u32 = 120;
pub const DEFAULT_STEP_DAYS: u32 = 7;

/// Longest history a rollup may cover (ten years)
pub const MAX_SPAN_DAYS: u32 = 3650;
/// Longest trailing summary window (ten years)
pub const MAX_SUMMARY_WEEKS: u32 = 520;

/// One point of the weekly time series
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStats {
    /// Date of the window end, used as the chart label
    pub label: NaiveDate,
    pub report: WindowReport,
}

/// Trailing windows of `step_days` covering `span_days` back from
/// `reference_time`, newest first.
///
/// Windows that would start before the earliest representable time are
/// dropped.
pub fn rolling_windows(reference_time: DateTime<Utc>, span_days: u32, step_days: u32) -> Vec<Window> {
    if step_days == 0 {
        return Vec::new();
    }
    (0..span_days)
        .step_by(step_days as usize)
        .map_while(|offset| {
            let end = reference_time.checked_sub_signed(Duration::days(i64::from(offset)))?;
            let start = end.checked_sub_signed(Duration::days(i64::from(step_days)))?;
            Some(Window::new(start, end))
        })
        .collect()
}

/// Aggregate every rolling window for both contributor classes.
///
/// Entries come back newest first, matching [`rolling_windows`].
pub fn rollup(
    records: &[PrRecord],
    scope: &TeamScope,
    reference_time: DateTime<Utc>,
    span_days: u32,
    step_days: u32,
) -> Vec<PeriodStats> {
    let periods: Vec<PeriodStats> = rolling_windows(reference_time, span_days, step_days)
        .into_iter()
        .map(|window| PeriodStats {
            label: window.end.date_naive(),
            report: aggregate_window(records, scope, window),
        })
        .collect();
    debug!(
        "Computed {} periods of {} days over the last {} days",
        periods.len(),
        step_days,
        span_days
    );
    periods
}

/// Statistics for the last `weeks` weeks ending at `reference_time`.
///
/// A window reaching past the earliest representable time starts there.
pub fn trailing_summary(
    records: &[PrRecord],
    scope: &TeamScope,
    reference_time: DateTime<Utc>,
    weeks: u32,
) -> WindowReport {
    let start = reference_time
        .checked_sub_signed(Duration::weeks(i64::from(weeks)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let window = Window::new(start, reference_time);
    aggregate_window(records, scope, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{at, merged_record, open_record};
    use chrono::TimeZone;

    #[test]
    fn test_two_week_span_gives_two_tiling_windows() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let windows = rolling_windows(reference, 14, 7);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end, reference);
        assert_eq!(windows[0].start, reference - Duration::days(7));
        assert_eq!(windows[1].end, windows[0].start);
        assert_eq!(windows[1].start, reference - Duration::days(14));
    }

    #[test]
    fn test_window_count_rounds_up() {
        let reference = at(2024, 6, 1);
        let windows = rolling_windows(reference, 120, 7);

        assert_eq!(windows.len(), 18);
        for window in &windows {
            assert_eq!(window.end - window.start, Duration::days(7));
        }
        assert_eq!(windows[17].end, reference - Duration::days(119));
    }

    #[test]
    fn test_zero_step_yields_nothing() {
        assert!(rolling_windows(at(2024, 6, 1), 120, 0).is_empty());
    }

    #[test]
    fn test_huge_span_stops_at_earliest_time() {
        let reference = at(2024, 6, 1);
        let windows = rolling_windows(reference, u32::MAX, 30_000_000);

        assert!(!windows.is_empty());
        assert!(windows.len() < 200);
        assert!(windows.iter().all(|w| w.start < w.end));
    }

    #[test]
    fn test_huge_trailing_summary_does_not_overflow() {
        let records = vec![open_record(1, "mallory")];
        let scope = TeamScope::new("main", ["alice"]);

        let report = trailing_summary(&records, &scope, at(2024, 2, 1), u32::MAX);

        assert_eq!(report.window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(report.external.count, 1);
    }

    #[test]
    fn test_rollup_labels_and_counts() {
        let records = vec![merged_record(1, "alice"), open_record(2, "mallory")];
        let scope = TeamScope::new("main", ["alice"]);

        let periods = rollup(&records, &scope, at(2024, 1, 15), 14, 7);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].label, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(periods[1].label, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());

        // Merged on Jan 3, only visible in the older window
        assert_eq!(periods[0].report.internal.count, 0);
        assert_eq!(periods[1].report.internal.count, 1);
        assert_eq!(periods[1].report.internal.closed_count, 1);

        // Still open, visible in both
        assert_eq!(periods[0].report.external.count, 1);
        assert_eq!(periods[1].report.external.count, 1);
    }

    #[test]
    fn test_trailing_summary_window() {
        let records = vec![open_record(1, "mallory")];
        let scope = TeamScope::new("main", ["alice"]);
        let reference = at(2024, 1, 29);

        let report = trailing_summary(&records, &scope, reference, 4);

        assert_eq!(report.window.start, at(2024, 1, 1));
        assert_eq!(report.window.end, reference);
        assert_eq!(report.external.count, 1);
        assert_eq!(report.external.avg_open_days, 28.0);
    }
}
