//! Tests for error types

use super::*;

// ============================================================================
// ConfigurationError Tests
// ============================================================================

#[test]
fn test_multiple_declarations_names_the_block() {
    let err = ConfigurationError::multiple_declarations("required_status_checks");

    assert_eq!(
        err.to_string(),
        "error multiple required_status_checks declarations"
    );
}

#[test]
fn test_review_count_out_of_range_message() {
    let err = ConfigurationError::ReviewCountOutOfRange {
        actual: 7,
        min: 1,
        max: 6,
    };

    assert_eq!(
        err.to_string(),
        "required_approving_review_count must be between 1 and 6, got 7"
    );
}

#[test]
fn test_empty_field() {
    let err = ConfigurationError::empty_field("pattern");

    match err {
        ConfigurationError::EmptyField { field } => assert_eq!(field, "pattern"),
        _ => panic!("Expected EmptyField variant"),
    }
}

// ============================================================================
// ProtectionError Tests
// ============================================================================

#[test]
fn test_configuration_error_converts() {
    let err: ProtectionError = ConfigurationError::multiple_declarations("push_restrictions").into();

    assert!(matches!(err, ProtectionError::Configuration(_)));
    assert!(err.to_string().contains("push_restrictions"));
}

#[test]
fn test_not_found_is_distinct_from_transport() {
    let not_found = ProtectionError::not_found("BPR_1");
    let transport = ProtectionError::GitHub(github_client::Error::Transport {
        endpoint: "https://api.github.com/graphql".to_string(),
        message: "connection reset".to_string(),
    });

    assert!(not_found.is_not_found());
    assert!(!transport.is_not_found());
    assert_eq!(
        not_found.to_string(),
        "Branch protection rule 'BPR_1' not found"
    );
}

#[test]
fn test_ambiguous_pattern_message() {
    let err = ProtectionError::AmbiguousPattern {
        repository: "octo/widgets".to_string(),
        pattern: "main".to_string(),
        count: 2,
    };

    assert_eq!(
        err.to_string(),
        "Pattern 'main' matches 2 branch protection rules in 'octo/widgets'"
    );
}

#[test]
fn test_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProtectionError>();
    assert_send_sync::<ConfigurationError>();
}
