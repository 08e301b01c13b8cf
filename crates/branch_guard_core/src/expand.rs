//! Flattening of the nested desired configuration.
//!
//! The GraphQL mutations take one flat list of fields plus a handful of
//! `requires*` / `restricts*` switches. Those switches are derived here, once,
//! and nowhere else.

use serde::Serialize;
use tracing::debug;

use crate::config::{BranchProtectionConfig, BranchProtectionInput};
use crate::errors::ConfigurationError;

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;

/// The flat form of a branch protection rule, ready for a mutation.
///
/// An empty actor or context list is indistinguishable from an absent block:
/// both leave the matching `restricts*` / `requires*` flag unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProtectionRecord {
    pub repository_id: String,
    pub pattern: String,
    pub is_admin_enforced: bool,
    pub requires_commit_signatures: bool,

    pub requires_approving_reviews: bool,
    /// `0` when no count was declared
    pub required_approving_review_count: i32,
    pub requires_code_owner_reviews: bool,
    pub dismisses_stale_reviews: bool,

    pub restricts_review_dismissals: bool,
    pub review_dismissal_actor_ids: Vec<String>,

    pub requires_status_checks: bool,
    pub requires_strict_status_checks: bool,
    pub required_status_check_contexts: Vec<String>,

    pub restricts_pushes: bool,
    pub push_actor_ids: Vec<String>,
}

/// Validates a declared configuration and flattens it.
///
/// # Errors
///
/// Any [`ConfigurationError`]: a block declared more than once, an out of
/// range review count, or an empty repository id or pattern.
///
/// # Examples
///
/// ```
/// use branch_guard_core::{expand, BranchProtectionInput};
///
/// let input = BranchProtectionInput {
///     repository_id: "R_1".to_string(),
///     pattern: "main".to_string(),
///     ..Default::default()
/// };
///
/// let record = expand(&input).unwrap();
/// assert!(!record.requires_approving_reviews);
/// ```
pub fn expand(input: &BranchProtectionInput) -> Result<ProtectionRecord, ConfigurationError> {
    let config = BranchProtectionConfig::try_from(input)?;
    Ok(expand_config(&config))
}

/// Flattens an already validated configuration.
pub fn expand_config(config: &BranchProtectionConfig) -> ProtectionRecord {
    let mut record = ProtectionRecord {
        repository_id: config.repository_id.clone(),
        pattern: config.pattern.clone(),
        is_admin_enforced: config.enforce_admins,
        requires_commit_signatures: config.require_signed_commits,
        ..Default::default()
    };

    if let Some(reviews) = &config.required_pull_request_reviews {
        record.requires_approving_reviews = true;
        record.required_approving_review_count =
            reviews.required_approving_review_count.unwrap_or(0);
        record.requires_code_owner_reviews = reviews.require_code_owner_reviews;
        record.dismisses_stale_reviews = reviews.dismiss_stale_reviews;

        if let Some(dismissal) = &reviews.dismissal_restrictions {
            record.review_dismissal_actor_ids = dismissal.actor_ids.clone();
            record.restricts_review_dismissals = !dismissal.actor_ids.is_empty();
        }
    }

    if let Some(checks) = &config.required_status_checks {
        record.requires_strict_status_checks = checks.strict;
        record.required_status_check_contexts = checks.contexts.clone();
        record.requires_status_checks = !checks.contexts.is_empty();
    }

    if let Some(push) = &config.push_restrictions {
        record.push_actor_ids = push.actor_ids.clone();
        record.restricts_pushes = !push.actor_ids.is_empty();
    }

    debug!(
        pattern = record.pattern.as_str(),
        requires_approving_reviews = record.requires_approving_reviews,
        restricts_review_dismissals = record.restricts_review_dismissals,
        requires_status_checks = record.requires_status_checks,
        restricts_pushes = record.restricts_pushes,
        "Expanded branch protection configuration"
    );

    record
}
