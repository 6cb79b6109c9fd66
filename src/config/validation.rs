use super::schema::Config;
use crate::stats::{MAX_SPAN_DAYS, MAX_SUMMARY_WEEKS};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.main_branch.trim().is_empty() {
        errors.push("main_branch: must not be empty".to_string());
    }

    if config.record_store.as_os_str().is_empty() {
        errors.push("record_store: must not be empty".to_string());
    }

    if config.report.span_days == 0 {
        errors.push("report.span_days: must be at least 1".to_string());
    } else if config.report.span_days > MAX_SPAN_DAYS {
        errors.push(format!("report.span_days: must be at most {}", MAX_SPAN_DAYS));
    }

    if config.report.step_days == 0 {
        errors.push("report.step_days: must be at least 1".to_string());
    }

    if config.report.summary_weeks.is_empty() {
        errors.push("report.summary_weeks: must list at least one window".to_string());
    }
    for (i, weeks) in config.report.summary_weeks.iter().enumerate() {
        if *weeks == 0 {
            errors.push(format!("report.summary_weeks[{}]: must be at least 1", i));
        } else if *weeks > MAX_SUMMARY_WEEKS {
            errors.push(format!(
                "report.summary_weeks[{}]: must be at most {}",
                i, MAX_SUMMARY_WEEKS
            ));
        }
    }

    for (i, member) in config.internal_members.iter().enumerate() {
        if member.trim().is_empty() {
            errors.push(format!("internal_members[{}]: login must not be empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = Config::default();
        config.main_branch = " ".to_string();
        config.report.step_days = 0;
        config.report.summary_weeks = vec![2, 0];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("main_branch"));
        assert!(errors[1].starts_with("report.step_days"));
        assert!(errors[2].starts_with("report.summary_weeks[1]"));
    }

    #[test]
    fn test_span_days_upper_bound() {
        let mut config = Config::default();
        config.report.span_days = MAX_SPAN_DAYS;
        assert!(validate_config(&config).is_ok());

        config.report.span_days = u32::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("report.span_days: must be at most"));
    }

    #[test]
    fn test_summary_weeks_upper_bound() {
        let mut config = Config::default();
        config.report.summary_weeks = vec![MAX_SUMMARY_WEEKS, u32::MAX];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("report.summary_weeks[1]: must be at most"));
    }

    #[test]
    fn test_empty_membership_is_allowed() {
        let config = Config {
            internal_members: Vec::new(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
