//! Reconciliation of branch protection rules.
//!
//! This module provides the [`BranchProtectionReconciler`], which drives a
//! rule through its lifecycle:
//!
//! ```text
//! absent -> creating -> present -> updating -> present -> deleting -> absent
//! ```
//!
//! Every write is followed by a fresh read so that callers always get back the
//! configuration GitHub actually stored.

use std::fmt;
use std::sync::Arc;

use github_client::branch_protection::{
    CreateRuleData, DeleteRuleData, RuleNode, RuleQueryData, UpdateRuleData,
    CREATE_RULE_MUTATION, DELETE_RULE_MUTATION, RULE_QUERY, UPDATE_RULE_MUTATION,
};
use github_client::graphql::{mutate_as, query_as};
use github_client::{
    BranchProtectionRule, DeleteBranchProtectionRuleInput, GraphQlClient, Variable, Variables,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{BranchProtectionConfig, BranchProtectionInput};
use crate::contract::contract;
use crate::errors::{ProtectionError, ProtectionResult};
use crate::expand::expand;
use crate::locator::{find_rule_id, repository_id};
use crate::mutation::{build_create_input, build_update_input};

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// The GraphQL node id of a branch protection rule.
///
/// This is the only handle a caller needs to keep between operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// State stored before rules were tracked by node id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyState {
    /// Repository name, without the owner
    pub repository: String,
    /// Branch name, used verbatim as the rule pattern
    pub branch: String,
}

/// The legacy state rewritten into the current shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedState {
    /// `None` if no rule with the branch as pattern exists anymore
    pub id: Option<RuleId>,
    pub repository_id: String,
    pub pattern: String,
}

/// Creates, reads, updates and deletes branch protection rules.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use branch_guard_core::{BranchProtectionInput, BranchProtectionReconciler};
/// use github_client::create_token_client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = create_token_client("https://api.github.com/", "ghp_example")?;
/// let reconciler = BranchProtectionReconciler::new(Arc::new(client), "my-org");
///
/// let input = BranchProtectionInput {
///     repository_id: "R_kgDOExample".to_string(),
///     pattern: "main".to_string(),
///     ..Default::default()
/// };
///
/// let (id, config) = reconciler.create(&input).await?;
/// println!("Created {} for {}", id, config.pattern);
/// # Ok(())
/// # }
/// ```
pub struct BranchProtectionReconciler {
    client: Arc<dyn GraphQlClient>,
    /// Organization or user owning the repositories; only used by migration
    owner: String,
}

impl BranchProtectionReconciler {
    /// Creates a new reconciler.
    ///
    /// # Arguments
    ///
    /// * `client` - Transport for GraphQL requests, shared read-only
    /// * `owner` - Owner used to resolve repositories by name
    pub fn new(client: Arc<dyn GraphQlClient>, owner: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
        }
    }

    /// Creates a rule from the desired configuration.
    ///
    /// # Returns
    ///
    /// The new rule id and the configuration read back from GitHub.
    ///
    /// # Errors
    ///
    /// - `ProtectionError::Configuration` before any request is made
    /// - `ProtectionError::MissingPayload` if GitHub did not return the new id
    /// - `ProtectionError::ReadBack` if the rule exists but could not be read;
    ///   the error carries the id so it is not lost
    #[instrument(skip(self, input), fields(pattern = %input.pattern))]
    pub async fn create(
        &self,
        input: &BranchProtectionInput,
    ) -> ProtectionResult<(RuleId, BranchProtectionConfig)> {
        let record = expand(input)?;
        let mutation = build_create_input(&record);

        info!(
            repository_id = record.repository_id.as_str(),
            "Creating branch protection rule"
        );
        let data: CreateRuleData =
            mutate_as(self.client.as_ref(), CREATE_RULE_MUTATION, &mutation).await?;

        let id = data
            .create_branch_protection_rule
            .and_then(|payload| payload.branch_protection_rule)
            .map(|rule| RuleId::from(rule.id))
            .ok_or_else(|| ProtectionError::missing_payload("createBranchProtectionRule"))?;

        info!(rule_id = %id, "Branch protection rule created");

        let config = self.read_back(&id).await?;
        Ok((id, config))
    }

    /// Reads the current configuration of a rule.
    ///
    /// This is also how an existing rule is imported: any node id of a
    /// branch protection rule can be passed.
    ///
    /// # Errors
    ///
    /// `ProtectionError::NotFound` if the rule no longer exists. Transport
    /// failures stay `ProtectionError::GitHub`.
    #[instrument(skip(self), fields(rule_id = %id))]
    pub async fn read(&self, id: &RuleId) -> ProtectionResult<BranchProtectionConfig> {
        let rule = self.fetch_rule(id).await?;
        contract(&rule)
    }

    /// Replaces the configuration of an existing rule.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create), plus `ProtectionError::NotFound` if
    /// the rule is gone.
    #[instrument(skip(self, input), fields(rule_id = %id, pattern = %input.pattern))]
    pub async fn update(
        &self,
        id: &RuleId,
        input: &BranchProtectionInput,
    ) -> ProtectionResult<BranchProtectionConfig> {
        let record = expand(input)?;
        let mutation = build_update_input(id.as_str(), &record);

        info!("Updating branch protection rule");
        let data: UpdateRuleData =
            mutate_as(self.client.as_ref(), UPDATE_RULE_MUTATION, &mutation)
                .await
                .map_err(|e| not_found_or(e, id))?;

        if data
            .update_branch_protection_rule
            .and_then(|payload| payload.branch_protection_rule)
            .is_none()
        {
            return Err(ProtectionError::missing_payload(
                "updateBranchProtectionRule",
            ));
        }

        self.read_back(id).await
    }

    /// Deletes a rule.
    ///
    /// GitHub confirms with an empty payload.
    ///
    /// # Errors
    ///
    /// `ProtectionError::NotFound` if the rule is already gone, so callers can
    /// drop their stored id.
    #[instrument(skip(self), fields(rule_id = %id))]
    pub async fn delete(&self, id: &RuleId) -> ProtectionResult<()> {
        let input = DeleteBranchProtectionRuleInput {
            branch_protection_rule_id: id.to_string(),
        };

        info!("Deleting branch protection rule");
        let _: DeleteRuleData = mutate_as(self.client.as_ref(), DELETE_RULE_MUTATION, &input)
            .await
            .map_err(|e| not_found_or(e, id))?;

        info!("Branch protection rule deleted");
        Ok(())
    }

    /// Rewrites a legacy `(repository, branch)` state into the current shape.
    ///
    /// The repository id is resolved by name under the reconciler's owner and
    /// the rule is located by using the branch as the pattern.
    ///
    /// # Errors
    ///
    /// - `ProtectionError::RepositoryNotFound` if the repository is gone
    /// - `ProtectionError::AmbiguousPattern` if several rules match the branch
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn migrate(&self, legacy: &LegacyState) -> ProtectionResult<MigratedState> {
        let client = self.client.as_ref();

        let repository_id = repository_id(client, &self.owner, &legacy.repository).await?;
        let id = find_rule_id(client, &self.owner, &legacy.repository, &legacy.branch)
            .await?
            .map(RuleId::from);

        if id.is_none() {
            warn!(
                repository = legacy.repository.as_str(),
                branch = legacy.branch.as_str(),
                "No branch protection rule found for legacy state"
            );
        }

        Ok(MigratedState {
            id,
            repository_id,
            pattern: legacy.branch.clone(),
        })
    }

    async fn fetch_rule(&self, id: &RuleId) -> ProtectionResult<BranchProtectionRule> {
        let mut variables = Variables::new();
        variables.insert("id".to_string(), Variable::id(id.as_str()));

        let data: RuleQueryData = query_as(self.client.as_ref(), RULE_QUERY, &variables)
            .await
            .map_err(|e| not_found_or(e, id))?;

        match data.node {
            Some(RuleNode::BranchProtectionRule(rule)) => {
                debug!(pattern = rule.pattern.as_str(), "Fetched branch protection rule");
                Ok(*rule)
            }
            Some(RuleNode::Other) => {
                warn!("Node id does not refer to a branch protection rule");
                Err(ProtectionError::not_found(id.as_str()))
            }
            None => Err(ProtectionError::not_found(id.as_str())),
        }
    }

    async fn read_back(&self, id: &RuleId) -> ProtectionResult<BranchProtectionConfig> {
        self.read(id).await.map_err(|e| ProtectionError::ReadBack {
            id: id.to_string(),
            source: Box::new(e),
        })
    }
}

fn not_found_or(e: github_client::Error, id: &RuleId) -> ProtectionError {
    if e.is_not_found() {
        ProtectionError::not_found(id.as_str())
    } else {
        ProtectionError::GitHub(e)
    }
}
