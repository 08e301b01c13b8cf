//! Branch protection rule wire types.
//!
//! This module contains the GraphQL documents and the request/response shapes
//! for GitHub's `BranchProtectionRule` object. The types follow the schema
//! closely; translating them into a caller facing configuration happens in the
//! reconciliation layer.
//!
//! See: https://docs.github.com/en/graphql/reference/objects#branchprotectionrule

use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, Connection, RepositoryRef};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Fetches a single rule by node id, including both allowance collections.
///
/// Actor ids are aliased per union member (`teamId` / `userId`) so that the
/// member that answered is visible after decoding.
pub const RULE_QUERY: &str = r#"
query($id: ID!) {
    node(id: $id) {
        __typename
        ... on BranchProtectionRule {
            id
            pattern
            dismissesStaleReviews
            isAdminEnforced
            requiredApprovingReviewCount
            requiredStatusCheckContexts
            requiresApprovingReviews
            requiresCodeOwnerReviews
            requiresCommitSignatures
            requiresStatusChecks
            requiresStrictStatusChecks
            restrictsPushes
            restrictsReviewDismissals
            repository {
                id
                name
            }
            pushAllowances(first: 100) {
                nodes {
                    actor {
                        __typename
                        ... on Team { teamId: id teamName: name }
                        ... on User { userId: id userName: name }
                    }
                }
            }
            reviewDismissalAllowances(first: 100) {
                nodes {
                    actor {
                        __typename
                        ... on Team { teamId: id teamName: name }
                        ... on User { userId: id userName: name }
                    }
                }
            }
        }
    }
}
"#;

/// Lists the `(id, pattern)` pairs of a repository's rules, one page at a time.
pub const RULES_PAGE_QUERY: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $cursor: String) {
    repository(owner: $owner, name: $name) {
        id
        branchProtectionRules(first: $first, after: $cursor) {
            nodes {
                id
                pattern
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}
"#;

/// Resolves a repository's node id from its owner and name.
pub const REPOSITORY_ID_QUERY: &str = r#"
query($owner: String!, $name: String!) {
    repository(owner: $owner, name: $name) {
        id
        name
    }
}
"#;

pub const CREATE_RULE_MUTATION: &str = r#"
mutation($input: CreateBranchProtectionRuleInput!) {
    createBranchProtectionRule(input: $input) {
        branchProtectionRule {
            id
        }
    }
}
"#;

pub const UPDATE_RULE_MUTATION: &str = r#"
mutation($input: UpdateBranchProtectionRuleInput!) {
    updateBranchProtectionRule(input: $input) {
        branchProtectionRule {
            id
        }
    }
}
"#;

/// The payload type has no useful fields, so only `clientMutationId` is requested.
pub const DELETE_RULE_MUTATION: &str = r#"
mutation($input: DeleteBranchProtectionRuleInput!) {
    deleteBranchProtectionRule(input: $input) {
        clientMutationId
    }
}
"#;

/// A branch protection rule as stored by GitHub.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchProtectionRule {
    /// The GraphQL node ID of the rule
    pub id: String,

    /// Branch name pattern, e.g. `main` or `release/*`
    pub pattern: String,

    /// Owning repository
    pub repository: RepositoryRef,

    pub dismisses_stale_reviews: bool,

    pub is_admin_enforced: bool,

    /// `null` when no review count was ever configured
    #[serde(default)]
    pub required_approving_review_count: Option<i32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub required_status_check_contexts: Vec<String>,

    pub requires_approving_reviews: bool,

    pub requires_code_owner_reviews: bool,

    pub requires_commit_signatures: bool,

    pub requires_status_checks: bool,

    pub requires_strict_status_checks: bool,

    pub restricts_pushes: bool,

    pub restricts_review_dismissals: bool,

    /// Actors allowed to push when `restricts_pushes` is set
    #[serde(default)]
    pub push_allowances: Connection<Allowance>,

    /// Actors allowed to dismiss reviews when `restricts_review_dismissals` is set
    #[serde(default)]
    pub review_dismissal_allowances: Connection<Allowance>,
}

/// A push or review dismissal allowance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Allowance {
    /// `null` when the actor is not visible to the token
    #[serde(default)]
    pub actor: Option<AllowanceActor>,
}

/// The actor of an allowance, decoded from the `Team | User | App` union.
///
/// Each union member fills its own slot. `App` actors carry no slot because
/// installation tokens cannot be granted the permissions to manage them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceActor {
    #[serde(rename = "__typename", default)]
    pub typename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl AllowanceActor {
    /// A team actor.
    pub fn team(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            typename: "Team".to_string(),
            team_id: Some(id.into()),
            team_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// A user actor.
    pub fn user(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            typename: "User".to_string(),
            user_id: Some(id.into()),
            user_name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// The `node(id:)` lookup, discriminated on `__typename`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum RuleNode {
    BranchProtectionRule(Box<BranchProtectionRule>),
    /// Any other node type; the id does not refer to a rule
    #[serde(other)]
    Other,
}

/// Response data of [`RULE_QUERY`].
#[derive(Clone, Debug, Deserialize)]
pub struct RuleQueryData {
    pub node: Option<RuleNode>,
}

/// The `(id, pattern)` pair returned by [`RULES_PAGE_QUERY`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSummary {
    pub id: String,
    pub pattern: String,
}

/// Response data of [`RULES_PAGE_QUERY`].
#[derive(Clone, Debug, Deserialize)]
pub struct RulesPageData {
    pub repository: Option<RepositoryRules>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRules {
    pub id: String,
    pub branch_protection_rules: Connection<RuleSummary>,
}

/// Response data of [`REPOSITORY_ID_QUERY`].
#[derive(Clone, Debug, Deserialize)]
pub struct RepositoryData {
    pub repository: Option<RepositoryRef>,
}

/// Input of `createBranchProtectionRule`.
///
/// Every optional field is a present/absent marker: `None` is omitted from the
/// request, `Some(false)` or `Some(vec![])` is sent as an explicit value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchProtectionRuleInput {
    pub repository_id: String,

    pub pattern: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismisses_stale_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin_enforced: Option<bool>,

    #[serde(rename = "pushActorIds", skip_serializing_if = "Option::is_none")]
    pub push_actor_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status_check_contexts: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_approving_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_code_owner_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_commit_signatures: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_status_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_strict_status_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricts_pushes: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricts_review_dismissals: Option<bool>,

    #[serde(rename = "reviewDismissalActorIds", skip_serializing_if = "Option::is_none")]
    pub review_dismissal_actor_ids: Option<Vec<String>>,
}

/// Input of `updateBranchProtectionRule`.
///
/// Omitted fields are left unchanged by GitHub.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchProtectionRuleInput {
    pub branch_protection_rule_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismisses_stale_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin_enforced: Option<bool>,

    #[serde(rename = "pushActorIds", skip_serializing_if = "Option::is_none")]
    pub push_actor_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status_check_contexts: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_approving_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_code_owner_reviews: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_commit_signatures: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_status_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_strict_status_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricts_pushes: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricts_review_dismissals: Option<bool>,

    #[serde(rename = "reviewDismissalActorIds", skip_serializing_if = "Option::is_none")]
    pub review_dismissal_actor_ids: Option<Vec<String>>,
}

/// Input of `deleteBranchProtectionRule`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBranchProtectionRuleInput {
    pub branch_protection_rule_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleIdRef {
    pub id: String,
}

/// Payload shared by the create and update mutations.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMutationPayload {
    pub branch_protection_rule: Option<RuleIdRef>,
}

/// Response data of [`CREATE_RULE_MUTATION`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleData {
    pub create_branch_protection_rule: Option<RuleMutationPayload>,
}

/// Response data of [`UPDATE_RULE_MUTATION`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleData {
    pub update_branch_protection_rule: Option<RuleMutationPayload>,
}

/// Response data of [`DELETE_RULE_MUTATION`].
///
/// GitHub answers with an empty confirmation, so every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRuleData {
    #[serde(default)]
    pub delete_branch_protection_rule: Option<DeleteRulePayload>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRulePayload {
    #[serde(default)]
    pub client_mutation_id: Option<String>,
}
