//! Desired branch protection configuration.
//!
//! Two shapes exist for the same data:
//! - [`BranchProtectionInput`] is what a caller declares. Optional blocks are
//!   lists so that a block declared twice is still representable and can be
//!   rejected with a useful message.
//! - [`BranchProtectionConfig`] is the validated form. Every block is an
//!   `Option`, actor and context sets are deduplicated, and the review count is
//!   known to be in range.
//!
//! Both shapes use the field names of the provider schema
//! (`required_pull_request_reviews`, `push_restrictions`, ...) so they can be
//! read from TOML or JSON files directly.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ConfigurationError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

pub const REQUIRED_PULL_REQUEST_REVIEWS: &str = "required_pull_request_reviews";
pub const DISMISSAL_RESTRICTIONS: &str = "dismissal_restrictions";
pub const REQUIRED_STATUS_CHECKS: &str = "required_status_checks";
pub const PUSH_RESTRICTIONS: &str = "push_restrictions";

pub const MIN_APPROVING_REVIEW_COUNT: i32 = 1;
pub const MAX_APPROVING_REVIEW_COUNT: i32 = 6;

/// A branch protection rule as declared by the caller.
///
/// # Examples
///
/// ```
/// use branch_guard_core::BranchProtectionInput;
///
/// let input: BranchProtectionInput = serde_json::from_str(r#"{
///     "repository_id": "R_kgDOExample",
///     "pattern": "main",
///     "required_pull_request_reviews": [{ "required_approving_review_count": 2 }]
/// }"#).unwrap();
///
/// assert_eq!(input.required_pull_request_reviews.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BranchProtectionInput {
    /// GraphQL node id of the repository the rule belongs to
    pub repository_id: String,

    /// Branch name pattern the rule applies to
    pub pattern: String,

    #[serde(default)]
    pub enforce_admins: bool,

    #[serde(default)]
    pub require_signed_commits: bool,

    #[serde(default, deserialize_with = "one_or_many")]
    pub required_pull_request_reviews: Vec<ApprovingReviewsInput>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub required_status_checks: Vec<StatusChecks>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub push_restrictions: Vec<PushRestrictions>,
}

/// A declared `required_pull_request_reviews` block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovingReviewsInput {
    #[serde(default)]
    pub required_approving_review_count: Option<i32>,

    #[serde(default)]
    pub require_code_owner_reviews: bool,

    #[serde(default)]
    pub dismiss_stale_reviews: bool,

    #[serde(default, deserialize_with = "one_or_many")]
    pub dismissal_restrictions: Vec<DismissalRestrictions>,
}

/// Actors allowed to dismiss pull request reviews.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DismissalRestrictions {
    #[serde(default)]
    pub actor_ids: Vec<String>,
}

/// Status checks that must pass before merging.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatusChecks {
    /// Require branches to be up to date before merging
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Actors allowed to push to matching branches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PushRestrictions {
    #[serde(default)]
    pub actor_ids: Vec<String>,
}

/// The validated desired configuration.
///
/// This is also what reads return: the contractor rebuilds it from the live
/// rule, so comparing a declared config against a read one is a plain `==`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchProtectionConfig {
    pub repository_id: String,
    pub pattern: String,
    pub enforce_admins: bool,
    pub require_signed_commits: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_pull_request_reviews: Option<ApprovingReviews>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_status_checks: Option<StatusChecks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_restrictions: Option<PushRestrictions>,
}

/// The validated `required_pull_request_reviews` block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApprovingReviews {
    /// Between 1 and 6 when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<i32>,

    pub require_code_owner_reviews: bool,

    pub dismiss_stale_reviews: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<DismissalRestrictions>,
}

impl TryFrom<&BranchProtectionInput> for BranchProtectionConfig {
    type Error = ConfigurationError;

    fn try_from(input: &BranchProtectionInput) -> Result<Self, Self::Error> {
        if input.repository_id.trim().is_empty() {
            return Err(ConfigurationError::empty_field("repository_id"));
        }
        if input.pattern.trim().is_empty() {
            return Err(ConfigurationError::empty_field("pattern"));
        }

        let required_pull_request_reviews =
            at_most_one(&input.required_pull_request_reviews, REQUIRED_PULL_REQUEST_REVIEWS)?
                .map(ApprovingReviews::try_from)
                .transpose()?;

        let required_status_checks =
            at_most_one(&input.required_status_checks, REQUIRED_STATUS_CHECKS)?.map(|checks| {
                StatusChecks {
                    strict: checks.strict,
                    contexts: dedup_preserving_order(&checks.contexts),
                }
            });

        let push_restrictions =
            at_most_one(&input.push_restrictions, PUSH_RESTRICTIONS)?.map(|push| {
                PushRestrictions {
                    actor_ids: dedup_preserving_order(&push.actor_ids),
                }
            });

        Ok(Self {
            repository_id: input.repository_id.clone(),
            pattern: input.pattern.clone(),
            enforce_admins: input.enforce_admins,
            require_signed_commits: input.require_signed_commits,
            required_pull_request_reviews,
            required_status_checks,
            push_restrictions,
        })
    }
}

impl TryFrom<&ApprovingReviewsInput> for ApprovingReviews {
    type Error = ConfigurationError;

    fn try_from(reviews: &ApprovingReviewsInput) -> Result<Self, Self::Error> {
        if let Some(count) = reviews.required_approving_review_count {
            if !(MIN_APPROVING_REVIEW_COUNT..=MAX_APPROVING_REVIEW_COUNT).contains(&count) {
                return Err(ConfigurationError::ReviewCountOutOfRange {
                    actual: count,
                    min: MIN_APPROVING_REVIEW_COUNT,
                    max: MAX_APPROVING_REVIEW_COUNT,
                });
            }
        }

        let dismissal_restrictions =
            at_most_one(&reviews.dismissal_restrictions, DISMISSAL_RESTRICTIONS)?.map(|d| {
                DismissalRestrictions {
                    actor_ids: dedup_preserving_order(&d.actor_ids),
                }
            });

        Ok(Self {
            required_approving_review_count: reviews.required_approving_review_count,
            require_code_owner_reviews: reviews.require_code_owner_reviews,
            dismiss_stale_reviews: reviews.dismiss_stale_reviews,
            dismissal_restrictions,
        })
    }
}

impl From<BranchProtectionConfig> for BranchProtectionInput {
    fn from(config: BranchProtectionConfig) -> Self {
        Self {
            repository_id: config.repository_id,
            pattern: config.pattern,
            enforce_admins: config.enforce_admins,
            require_signed_commits: config.require_signed_commits,
            required_pull_request_reviews: config
                .required_pull_request_reviews
                .map(|reviews| ApprovingReviewsInput {
                    required_approving_review_count: reviews.required_approving_review_count,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    dismissal_restrictions: reviews.dismissal_restrictions.into_iter().collect(),
                })
                .into_iter()
                .collect(),
            required_status_checks: config.required_status_checks.into_iter().collect(),
            push_restrictions: config.push_restrictions.into_iter().collect(),
        }
    }
}

fn at_most_one<'a, T>(blocks: &'a [T], name: &str) -> Result<Option<&'a T>, ConfigurationError> {
    match blocks {
        [] => Ok(None),
        [block] => Ok(Some(block)),
        _ => Err(ConfigurationError::multiple_declarations(name)),
    }
}

/// Removes duplicates, keeping the first occurrence of each value.
pub fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// Accepts a single table/object as well as a list of them.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(blocks)) => blocks,
        Some(OneOrMany::One(block)) => vec![block],
    })
}
