use crate::records::PrRecord;
use crate::stats::{days_between, Contributor, TeamScope};
use chrono::{DateTime, Duration, Utc};
use std::fmt::Write;

/// Open PRs of `contributor` created at least `min_days` before `now`
pub fn slow_prs<'a>(
    records: &'a [PrRecord],
    scope: &TeamScope,
    now: DateTime<Utc>,
    min_days: u32,
    contributor: Contributor,
) -> Vec<&'a PrRecord> {
    let cutoff = now - Duration::days(i64::from(min_days));
    records
        .iter()
        .filter(|pr| pr.is_open() && scope.counts(pr))
        .filter(|pr| scope.classify(pr) == contributor)
        .filter(|pr| pr.created_at <= cutoff)
        .collect()
}

/// Open PRs nobody is assigned to
pub fn unassigned_prs<'a>(records: &'a [PrRecord], scope: &TeamScope) -> Vec<&'a PrRecord> {
    records
        .iter()
        .filter(|pr| pr.is_open() && scope.counts(pr))
        .filter(|pr| pr.assignees.is_empty())
        .collect()
}

/// Square brackets would end the Markdown link text early
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn format_pr_link(pr: &PrRecord) -> String {
    format!(
        "#{} - {} - [{}]({})",
        pr.number,
        pr.author,
        escape_link_text(&pr.title),
        pr.url
    )
}

/// Section listing slow PRs with their age; empty when there are none
pub fn render_slow_prs(prs: &[&PrRecord], contributor: Contributor, min_days: u32, now: DateTime<Utc>) -> String {
    if prs.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "## {} PRs open for more than {} days\n\n",
        contributor.label(),
        min_days
    );
    for pr in prs {
        let _ = writeln!(
            out,
            "* [{} days] {}",
            days_between(pr.created_at, now),
            format_pr_link(pr)
        );
    }
    out.push('\n');
    out
}

/// Section listing unassigned PRs; empty when there are none
pub fn render_unassigned_prs(prs: &[&PrRecord]) -> String {
    if prs.is_empty() {
        return String::new();
    }
    let mut out = String::from("## PRs without assignees\n\n");
    for pr in prs {
        let _ = writeln!(out, "* {}", format_pr_link(pr));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{at, merged_record, open_record};

    fn scope() -> TeamScope {
        TeamScope::new("main", ["alice"])
    }

    #[test]
    fn test_slow_prs_by_class_and_age() {
        let mut recent = open_record(3, "mallory");
        recent.created_at = at(2024, 1, 20);
        let mut draft = open_record(4, "mallory");
        draft.is_draft = true;
        let records = vec![
            open_record(1, "alice"),
            open_record(2, "mallory"),
            recent,
            draft,
            merged_record(5, "mallory"),
        ];
        let now = at(2024, 1, 25);

        let external = slow_prs(&records, &scope(), now, 10, Contributor::External);
        let numbers: Vec<u64> = external.iter().map(|pr| pr.number).collect();
        assert_eq!(numbers, vec![2]);

        let internal = slow_prs(&records, &scope(), now, 10, Contributor::Internal);
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].number, 1);
    }

    #[test]
    fn test_slow_pr_on_cutoff_is_listed() {
        let records = vec![open_record(1, "mallory")];
        let listed = slow_prs(&records, &scope(), at(2024, 1, 11), 10, Contributor::External);
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_unassigned_prs() {
        let mut assigned = open_record(1, "alice");
        assigned.assignees = vec!["bob".to_string()];
        let records = vec![assigned, open_record(2, "mallory"), merged_record(3, "eve")];

        let unassigned = unassigned_prs(&records, &scope());
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].number, 2);
    }

    #[test]
    fn test_render_slow_prs() {
        let mut pr = open_record(42, "mallory");
        pr.title = "Fix [urgent] crash".to_string();
        let rendered = render_slow_prs(&[&pr], Contributor::External, 10, at(2024, 1, 15));

        assert!(rendered.starts_with("## External PRs open for more than 10 days\n\n"));
        assert!(rendered.contains(
            "* [14 days] #42 - mallory - [Fix \\[urgent\\] crash](https://github.com/owner/repo/pull/42)"
        ));
    }

    #[test]
    fn test_empty_sections_render_nothing() {
        assert!(render_slow_prs(&[], Contributor::Internal, 10, at(2024, 1, 15)).is_empty());
        assert!(render_unassigned_prs(&[]).is_empty());
    }
}
