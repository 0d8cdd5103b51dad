//! Integration tests for core task and outcome types.

use tally_core::{CancellationToken, CountResult, FailureKind, Outcome, SubjectKind, Task, TaskFailure};

#[test]
fn test_outcome_serialization_roundtrip() {
    let outcome = Outcome::Counted(CountResult::new("https://example.com", 2));
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: Outcome = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, outcome);
}

#[test]
fn test_failure_for_unrecognized_subject() {
    let subject = "not-a-path-or-url";
    let err = SubjectKind::classify(subject).unwrap_err();
    let failure = TaskFailure::new(subject, FailureKind::Unrecognized, err.to_string());

    assert_eq!(failure.subject, subject);
    assert!(failure.cause.contains(subject));
}

#[test]
fn test_tasks_cancel_independently() {
    let a = Task::with_cancel("/a", CancellationToken::new());
    let b = Task::new("/b");

    a.cancel.cancel();

    assert!(a.is_cancelled());
    assert!(!b.is_cancelled());
}
