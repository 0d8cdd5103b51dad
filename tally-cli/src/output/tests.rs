//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use crate::report::Report;
    use tally_core::{CountResult, FailureKind, Outcome, TaskFailure};

    #[test]
    fn test_result_line() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_result(&CountResult::new("https://go.dev", 12));
        assert_eq!(line, "https://go.dev: 12");
    }

    #[test]
    fn test_failure_line() {
        let formatter = TextFormatter::new(false);
        let failure = TaskFailure::new(
            "bogus",
            FailureKind::Unrecognized,
            "Invalid filename or url bogus",
        );
        assert_eq!(
            formatter.format_failure(&failure),
            "bogus: error: Invalid filename or url bogus"
        );
    }

    #[test]
    fn test_total_line() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_total(0), "Total: 0");
        assert_eq!(formatter.format_total(42), "Total: 42");
    }

    #[test]
    fn test_colors() {
        let formatter = TextFormatter::new(true);

        let failed = TaskFailure::new("/a", FailureKind::Fetch, "File not found: /a");
        assert!(formatter.format_failure(&failed).contains("\x1b[31m"));

        let cancelled = TaskFailure::new("/b", FailureKind::Cancelled, "Job Cancelled");
        assert!(formatter.format_failure(&cancelled).contains("\x1b[33m"));

        assert!(formatter.format_total(1).contains("\x1b[1m"));
    }

    #[test]
    fn test_digest() {
        let formatter = TextFormatter::new(false);
        let mut report = Report::new("Go");
        report.record(Outcome::Counted(CountResult::new("/a", 1)));
        report.record(Outcome::Failed(TaskFailure::new(
            "/b",
            FailureKind::Cancelled,
            "Job Cancelled",
        )));

        assert_eq!(
            formatter.format_digest(&report),
            "2 subjects, 1 counted, 1 failed (1 cancelled)"
        );
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use crate::report::Report;
    use tally_core::{CountResult, FailureKind, Outcome, TaskFailure};

    fn sample() -> Report {
        let mut report = Report::new("Go");
        report.record(Outcome::Counted(CountResult::new("/docs/a.txt", 4)));
        report.record(Outcome::Counted(CountResult::new("https://go.dev", 2)));
        report.record(Outcome::Failed(TaskFailure::new(
            "bogus",
            FailureKind::Unrecognized,
            "Invalid filename or url bogus",
        )));
        report
    }

    #[test]
    fn test_report_shape() {
        let json = JsonFormatter::new(false).format_report(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["target"], "Go");
        assert_eq!(value["total"], 6);
        assert_eq!(value["results"][0]["subject"], "/docs/a.txt");
        assert_eq!(value["results"][1]["count"], 2);
        assert_eq!(value["failures"][0]["kind"], "unrecognized");
        assert_eq!(value["failures"][0]["cause"], "Invalid filename or url bogus");
    }

    #[test]
    fn test_pretty_output() {
        let compact = JsonFormatter::new(false).format_report(&sample()).unwrap();
        let pretty = JsonFormatter::new(true).format_report(&sample()).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
        );
    }

    #[test]
    fn test_empty_report() {
        let json = JsonFormatter::new(false).format_report(&Report::new("Go")).unwrap();
        assert_eq!(
            json,
            r#"{"target":"Go","results":[],"failures":[],"total":0}"#
        );
    }
}
