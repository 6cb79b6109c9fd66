pub mod buckets;
pub mod classify;
pub mod rollup;
pub mod window;

pub use buckets::{buckets_for, AgeBucket, BucketCounts, Threshold};
pub use classify::{effective_end_date, is_external, Contributor, TeamScope};
pub use rollup::{
    rolling_windows, rollup, trailing_summary, PeriodStats, DEFAULT_SPAN_DAYS, DEFAULT_STEP_DAYS,
    MAX_SPAN_DAYS, MAX_SUMMARY_WEEKS,
};
pub use window::{aggregate, aggregate_window, days_between, Window, WindowReport, WindowStats};
