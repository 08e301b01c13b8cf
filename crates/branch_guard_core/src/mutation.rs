//! Mutation inputs built from a flat record.
//!
//! Every field this crate owns is sent explicitly, including `false` and empty
//! lists. Leaving a field out would make GitHub keep whatever value it already
//! has.

use github_client::{CreateBranchProtectionRuleInput, UpdateBranchProtectionRuleInput};

use crate::expand::ProtectionRecord;

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;

/// Builds the input of `createBranchProtectionRule`.
pub fn build_create_input(record: &ProtectionRecord) -> CreateBranchProtectionRuleInput {
    CreateBranchProtectionRuleInput {
        repository_id: record.repository_id.clone(),
        pattern: record.pattern.clone(),
        dismisses_stale_reviews: Some(record.dismisses_stale_reviews),
        is_admin_enforced: Some(record.is_admin_enforced),
        push_actor_ids: Some(record.push_actor_ids.clone()),
        required_approving_review_count: Some(record.required_approving_review_count),
        required_status_check_contexts: Some(record.required_status_check_contexts.clone()),
        requires_approving_reviews: Some(record.requires_approving_reviews),
        requires_code_owner_reviews: Some(record.requires_code_owner_reviews),
        requires_commit_signatures: Some(record.requires_commit_signatures),
        requires_status_checks: Some(record.requires_status_checks),
        requires_strict_status_checks: Some(record.requires_strict_status_checks),
        restricts_pushes: Some(record.restricts_pushes),
        restricts_review_dismissals: Some(record.restricts_review_dismissals),
        review_dismissal_actor_ids: Some(record.review_dismissal_actor_ids.clone()),
    }
}

/// Builds the input of `updateBranchProtectionRule` for the rule `rule_id`.
///
/// The repository cannot change on update, so only the pattern is carried
/// over from the identifying fields.
pub fn build_update_input(
    rule_id: &str,
    record: &ProtectionRecord,
) -> UpdateBranchProtectionRuleInput {
    UpdateBranchProtectionRuleInput {
        branch_protection_rule_id: rule_id.to_string(),
        pattern: Some(record.pattern.clone()),
        dismisses_stale_reviews: Some(record.dismisses_stale_reviews),
        is_admin_enforced: Some(record.is_admin_enforced),
        push_actor_ids: Some(record.push_actor_ids.clone()),
        required_approving_review_count: Some(record.required_approving_review_count),
        required_status_check_contexts: Some(record.required_status_check_contexts.clone()),
        requires_approving_reviews: Some(record.requires_approving_reviews),
        requires_code_owner_reviews: Some(record.requires_code_owner_reviews),
        requires_commit_signatures: Some(record.requires_commit_signatures),
        requires_status_checks: Some(record.requires_status_checks),
        requires_strict_status_checks: Some(record.requires_strict_status_checks),
        restricts_pushes: Some(record.restricts_pushes),
        restricts_review_dismissals: Some(record.restricts_review_dismissals),
        review_dismissal_actor_ids: Some(record.review_dismissal_actor_ids.clone()),
    }
}
