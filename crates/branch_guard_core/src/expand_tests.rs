use super::*;
use crate::config::{
    ApprovingReviewsInput, DismissalRestrictions, PushRestrictions, StatusChecks,
};

fn input(pattern: &str) -> BranchProtectionInput {
    BranchProtectionInput {
        repository_id: "R_1".to_string(),
        pattern: pattern.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_scalars_are_copied() {
    let mut input = input("main");
    input.enforce_admins = true;
    input.require_signed_commits = true;

    let record = expand(&input).unwrap();

    assert_eq!(record.repository_id, "R_1");
    assert_eq!(record.pattern, "main");
    assert!(record.is_admin_enforced);
    assert!(record.requires_commit_signatures);
}

#[test]
fn test_absent_blocks_leave_every_flag_unset() {
    let record = expand(&input("main")).unwrap();

    assert!(!record.requires_approving_reviews);
    assert!(!record.restricts_review_dismissals);
    assert!(!record.requires_status_checks);
    assert!(!record.restricts_pushes);
    assert_eq!(record.required_approving_review_count, 0);
}

#[test]
fn test_review_block_with_count_and_stale_dismissal() {
    let mut input = input("main");
    input.required_pull_request_reviews = vec![ApprovingReviewsInput {
        required_approving_review_count: Some(2),
        dismiss_stale_reviews: true,
        ..Default::default()
    }];

    let record = expand(&input).unwrap();

    assert!(record.requires_approving_reviews);
    assert_eq!(record.required_approving_review_count, 2);
    assert!(record.dismisses_stale_reviews);
    assert!(!record.requires_code_owner_reviews);
    assert!(!record.restricts_review_dismissals);
    assert!(!record.requires_status_checks);
    assert!(!record.restricts_pushes);
}

#[test]
fn test_review_block_without_count_sends_zero() {
    let mut input = input("main");
    input.required_pull_request_reviews = vec![ApprovingReviewsInput::default()];

    let record = expand(&input).unwrap();

    assert!(record.requires_approving_reviews);
    assert_eq!(record.required_approving_review_count, 0);
}

#[test]
fn test_dismissal_flag_tracks_actor_set() {
    let mut with_actors = input("main");
    with_actors.required_pull_request_reviews = vec![ApprovingReviewsInput {
        dismissal_restrictions: vec![DismissalRestrictions {
            actor_ids: vec!["T1".to_string()],
        }],
        ..Default::default()
    }];
    let mut without_actors = input("main");
    without_actors.required_pull_request_reviews = vec![ApprovingReviewsInput {
        dismissal_restrictions: vec![DismissalRestrictions::default()],
        ..Default::default()
    }];

    let record = expand(&with_actors).unwrap();
    assert!(record.restricts_review_dismissals);
    assert_eq!(record.review_dismissal_actor_ids, vec!["T1"]);

    assert!(!expand(&without_actors).unwrap().restricts_review_dismissals);
}

#[test]
fn test_status_check_flag_tracks_contexts() {
    let mut input = input("main");
    input.required_status_checks = vec![StatusChecks {
        strict: true,
        contexts: vec![],
    }];

    let record = expand(&input).unwrap();

    assert!(record.requires_strict_status_checks);
    assert!(!record.requires_status_checks);

    input.required_status_checks[0].contexts = vec!["ci/build".to_string()];
    let record = expand(&input).unwrap();

    assert!(record.requires_status_checks);
    assert_eq!(record.required_status_check_contexts, vec!["ci/build"]);
}

#[test]
fn test_push_flag_tracks_actor_set() {
    let mut input = input("main");
    input.push_restrictions = vec![PushRestrictions {
        actor_ids: vec!["T1".to_string(), "U1".to_string()],
    }];

    let record = expand(&input).unwrap();

    assert!(record.restricts_pushes);
    assert_eq!(record.push_actor_ids, vec!["T1", "U1"]);
}

#[test]
fn test_duplicate_block_fails_before_anything_is_built() {
    let mut input = input("main");
    input.push_restrictions = vec![PushRestrictions::default(), PushRestrictions::default()];

    let err = expand(&input).unwrap_err();
    assert_eq!(err.to_string(), "error multiple push_restrictions declarations");
}
