//! # BranchGuard Core
//!
//! This crate keeps GitHub branch protection rules in line with a declared
//! configuration, using the GraphQL API.
//!
//! ## Overview
//!
//! A write runs through the same pipeline every time:
//! 1. [`expand`] validates the nested [`BranchProtectionInput`] and flattens it
//!    into a [`ProtectionRecord`] with its derived switches
//! 2. [`mutation`] wraps the record into a create or update input
//! 3. the rule is read back by node id
//! 4. [`contract`] turns the live rule into a [`BranchProtectionConfig`]
//!
//! [`BranchProtectionReconciler`] sequences these steps and owns the rule id.
//! Rules stored by `(repository, branch)` in older state are converted with
//! [`BranchProtectionReconciler::migrate`], which pages through the
//! repository's rules via [`locator`].
//!
//! ## Architecture
//!
//! All remote access goes through [`github_client::GraphQlClient`], passed in
//! explicitly. Tests substitute a scripted client.

pub mod actor;
pub mod config;
pub mod contract;
pub mod errors;
pub mod expand;
pub mod locator;
pub mod mutation;
pub mod reconciler;
pub mod users;

#[cfg(test)]
mod test_support;

pub use actor::{resolve_actor, resolve_actor_ids, Actor};
pub use config::{
    ApprovingReviews, ApprovingReviewsInput, BranchProtectionConfig, BranchProtectionInput,
    DismissalRestrictions, PushRestrictions, StatusChecks,
};
pub use contract::contract;
pub use errors::{ConfigurationError, ProtectionError, ProtectionResult};
pub use expand::{expand, expand_config, ProtectionRecord};
pub use locator::{find_rule_id, repository_id};
pub use mutation::{build_create_input, build_update_input};
pub use reconciler::{BranchProtectionReconciler, LegacyState, MigratedState, RuleId};
pub use users::{lookup_user, lookup_users, token_info, TokenInfo, UsersLookup};
