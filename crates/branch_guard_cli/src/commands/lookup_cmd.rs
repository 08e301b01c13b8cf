//! Lookup commands.
//!
//! These resolve the node ids that rule files reference in `actor_ids`.

use auth_handler::{GitHubAuthService, TokenProvider};
use branch_guard_core::{lookup_user, lookup_users, token_info};
use clap::Args;
use github_client::GraphQlClient;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::{commands::render, config::ProviderConfig, errors::Error};

#[cfg(test)]
#[path = "lookup_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    /// Login of the user
    #[arg(long)]
    pub login: String,
}

#[derive(Args, Debug, Clone)]
pub struct UsersArgs {
    /// Logins to resolve, in order
    #[arg(long = "login", required = true)]
    pub logins: Vec<String>,

    /// Skip logins that do not exist instead of failing
    #[arg(long)]
    pub ignore_missing: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Print the token itself instead of a redacted placeholder
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Debug, Serialize)]
struct TokenOutput<'a> {
    id: &'a str,
    token: &'a str,
}

#[instrument(skip(client))]
pub async fn user(client: &dyn GraphQlClient, args: &UserArgs) -> Result<String, Error> {
    let user = lookup_user(client, &args.login).await?;
    render(&user)
}

#[instrument(skip(client))]
pub async fn users(client: &dyn GraphQlClient, args: &UsersArgs) -> Result<String, Error> {
    let lookup = lookup_users(client, &args.logins, args.ignore_missing).await?;
    render(&lookup)
}

/// Shows the token requests are authenticated with.
///
/// With app credentials this exchanges the app key for an installation token.
#[instrument(skip(config))]
pub async fn token(config: &ProviderConfig, args: &TokenArgs) -> Result<String, Error> {
    let organization = config.require_organization()?;
    let provider = GitHubAuthService::new(config.base_url.clone(), config.credentials()?);
    let token = provider.token().await?;

    let info = token_info(organization, token);
    let shown = if args.reveal {
        info.token.expose_secret()
    } else {
        "<REDACTED>"
    };

    render(&TokenOutput {
        id: &info.id,
        token: shown,
    })
}
