//! Command implementations for the BranchGuard CLI.
//!
//! - `rule_cmd`: create, read, update, delete and migrate branch protection rules
//! - `lookup_cmd`: user, batch user and token lookups
//!
//! Every command renders its result as pretty JSON so it can be piped into
//! other tools.

use std::sync::Arc;

use auth_handler::{authenticated_client, GitHubAuthService};
use clap::Subcommand;
use github_client::GraphQlClient;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{config::ProviderConfig, errors::Error};

pub mod lookup_cmd;
pub mod rule_cmd;

use lookup_cmd::{TokenArgs, UserArgs, UsersArgs};
use rule_cmd::{IdArgs, MigrateArgs, RuleFileArgs, UpdateArgs};

/// Top level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a branch protection rule from a TOML or JSON file
    Create(RuleFileArgs),

    /// Show the live configuration of a rule, e.g. to import it
    Read(IdArgs),

    /// Replace the configuration of an existing rule
    Update(UpdateArgs),

    /// Delete a rule
    Delete(IdArgs),

    /// Convert legacy `(repository, branch)` state to a rule id
    Migrate(MigrateArgs),

    /// Look up a user by login
    User(UserArgs),

    /// Look up several users by login
    Users(UsersArgs),

    /// Show the token the CLI authenticates with
    Token(TokenArgs),
}

/// Runs a command and returns its rendered output.
#[instrument(skip(config))]
pub async fn execute(command: &Commands, config: &ProviderConfig) -> Result<String, Error> {
    match command {
        Commands::Create(args) => rule_cmd::create(&connect(config).await?, config, args).await,
        Commands::Read(args) => rule_cmd::read(&connect(config).await?, config, args).await,
        Commands::Update(args) => rule_cmd::update(&connect(config).await?, config, args).await,
        Commands::Delete(args) => rule_cmd::delete(&connect(config).await?, config, args).await,
        Commands::Migrate(args) => rule_cmd::migrate(&connect(config).await?, config, args).await,
        Commands::User(args) => lookup_cmd::user(connect(config).await?.as_ref(), args).await,
        Commands::Users(args) => lookup_cmd::users(connect(config).await?.as_ref(), args).await,
        Commands::Token(args) => lookup_cmd::token(config, args).await,
    }
}

/// Builds an authenticated GraphQL client from the configuration.
pub async fn connect(config: &ProviderConfig) -> Result<Arc<dyn GraphQlClient>, Error> {
    let provider = GitHubAuthService::new(config.base_url.clone(), config.credentials()?);
    let client = authenticated_client(&config.base_url, &provider).await?;

    debug!(endpoint = %client.graphql_url(), "Connected to GitHub");
    Ok(Arc::new(client))
}

/// Renders a command result as pretty JSON.
pub fn render<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(Error::Output)
}
