//! Rebuilding the nested configuration from a live rule.
//!
//! This is the inverse of [`crate::expand`]: block presence follows GitHub's
//! `requires*` / `restricts*` switches, not the contents of the lists.

use github_client::BranchProtectionRule;

use crate::actor::resolve_actor_ids;
use crate::config::{
    ApprovingReviews, BranchProtectionConfig, DismissalRestrictions, PushRestrictions,
    StatusChecks,
};
use crate::errors::ProtectionResult;

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;

/// Converts a remote rule into the caller facing configuration.
///
/// A review count of `0` (or `null`) maps back to "not set". Actor lists keep
/// the order GitHub returned the allowances in.
///
/// # Errors
///
/// `ProtectionError::ActorConflict` if an allowance actor is ambiguous.
pub fn contract(rule: &BranchProtectionRule) -> ProtectionResult<BranchProtectionConfig> {
    let required_pull_request_reviews = if rule.requires_approving_reviews {
        let dismissal_restrictions = if rule.restricts_review_dismissals {
            Some(DismissalRestrictions {
                actor_ids: resolve_actor_ids(&rule.review_dismissal_allowances.nodes)?,
            })
        } else {
            None
        };

        Some(ApprovingReviews {
            required_approving_review_count: rule
                .required_approving_review_count
                .filter(|count| *count > 0),
            require_code_owner_reviews: rule.requires_code_owner_reviews,
            dismiss_stale_reviews: rule.dismisses_stale_reviews,
            dismissal_restrictions,
        })
    } else {
        None
    };

    let required_status_checks = rule.requires_status_checks.then(|| StatusChecks {
        strict: rule.requires_strict_status_checks,
        contexts: rule.required_status_check_contexts.clone(),
    });

    let push_restrictions = if rule.restricts_pushes {
        Some(PushRestrictions {
            actor_ids: resolve_actor_ids(&rule.push_allowances.nodes)?,
        })
    } else {
        None
    };

    Ok(BranchProtectionConfig {
        repository_id: rule.repository.id.clone(),
        pattern: rule.pattern.clone(),
        enforce_admins: rule.is_admin_enforced,
        require_signed_commits: rule.requires_commit_signatures,
        required_pull_request_reviews,
        required_status_checks,
        push_restrictions,
    })
}
