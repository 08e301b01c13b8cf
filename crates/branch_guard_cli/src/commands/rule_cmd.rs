//! Branch protection rule commands.
//!
//! # Examples
//!
//! ```bash
//! # Create a rule and print its id and stored configuration
//! branch-guard create --file main.toml
//!
//! # Re-read it later
//! branch-guard read --id BPR_kwDOExample
//!
//! # Convert old state that only knew the repository and branch
//! branch-guard migrate --repository widgets --branch main
//! ```
//!
//! Rule files use the field names of [`BranchProtectionInput`]:
//!
//! ```toml
//! repository_id = "R_kgDOExample"
//! pattern = "main"
//! enforce_admins = true
//!
//! [required_pull_request_reviews]
//! required_approving_review_count = 2
//! dismiss_stale_reviews = true
//!
//! [push_restrictions]
//! actor_ids = ["T_kwDOTeam", "U_kgDOUser"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use branch_guard_core::{
    BranchProtectionConfig, BranchProtectionInput, BranchProtectionReconciler, LegacyState,
    RuleId,
};
use clap::Args;
use github_client::GraphQlClient;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{commands::render, config::ProviderConfig, errors::Error};

#[cfg(test)]
#[path = "rule_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct RuleFileArgs {
    /// Path to the rule file (`.json` for JSON, TOML otherwise)
    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Node id of the branch protection rule
    #[arg(long)]
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Repository name, without the owner
    #[arg(long)]
    pub repository: String,

    /// Branch name stored in the legacy state
    #[arg(long)]
    pub branch: String,
}

/// A rule id together with its stored configuration.
#[derive(Debug, Serialize)]
pub struct RuleOutput {
    pub id: RuleId,
    pub config: BranchProtectionConfig,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: RuleId,
    deleted: bool,
}

/// Reads a rule file, choosing the format from the extension.
pub fn load_rule_input(path: &Path) -> Result<BranchProtectionInput, Error> {
    debug!("Loading rule from {:?}", path);

    let content = fs::read_to_string(path).map_err(Error::LoadFile)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(Error::ParseJsonFile)
    } else {
        toml::from_str(&content).map_err(Error::ParseTomlFile)
    }
}

fn reconciler(client: &Arc<dyn GraphQlClient>, config: &ProviderConfig) -> BranchProtectionReconciler {
    BranchProtectionReconciler::new(Arc::clone(client), config.organization.clone())
}

#[instrument(skip(client, config))]
pub async fn create(
    client: &Arc<dyn GraphQlClient>,
    config: &ProviderConfig,
    args: &RuleFileArgs,
) -> Result<String, Error> {
    let input = load_rule_input(&args.file)?;

    let (id, stored) = reconciler(client, config).create(&input).await?;

    info!(rule_id = %id, "Created branch protection rule");
    render(&RuleOutput { id, config: stored })
}

#[instrument(skip(client, config))]
pub async fn read(
    client: &Arc<dyn GraphQlClient>,
    config: &ProviderConfig,
    args: &IdArgs,
) -> Result<String, Error> {
    let id = RuleId::new(args.id.clone());

    let stored = reconciler(client, config).read(&id).await?;

    render(&RuleOutput { id, config: stored })
}

#[instrument(skip(client, config))]
pub async fn update(
    client: &Arc<dyn GraphQlClient>,
    config: &ProviderConfig,
    args: &UpdateArgs,
) -> Result<String, Error> {
    let input = load_rule_input(&args.file)?;
    let id = RuleId::new(args.id.clone());

    let stored = reconciler(client, config).update(&id, &input).await?;

    info!(rule_id = %id, "Updated branch protection rule");
    render(&RuleOutput { id, config: stored })
}

#[instrument(skip(client, config))]
pub async fn delete(
    client: &Arc<dyn GraphQlClient>,
    config: &ProviderConfig,
    args: &IdArgs,
) -> Result<String, Error> {
    let id = RuleId::new(args.id.clone());

    reconciler(client, config).delete(&id).await?;

    render(&DeleteOutput { id, deleted: true })
}

#[instrument(skip(client, config))]
pub async fn migrate(
    client: &Arc<dyn GraphQlClient>,
    config: &ProviderConfig,
    args: &MigrateArgs,
) -> Result<String, Error> {
    config.require_organization()?;

    let legacy = LegacyState {
        repository: args.repository.clone(),
        branch: args.branch.clone(),
    };

    let migrated = reconciler(client, config).migrate(&legacy).await?;

    render(&migrated)
}
