//! Crate for interacting with the GitHub GraphQL API.
//!
//! This crate provides a client for making authenticated GraphQL requests to
//! GitHub, authenticating either with a static token or with an installation
//! token obtained for a GitHub App. It also carries the wire types for the
//! queries and mutations the reconciler issues.

use async_trait::async_trait;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod branch_protection;
pub use branch_protection::{
    Allowance, AllowanceActor, BranchProtectionRule, CreateBranchProtectionRuleInput,
    DeleteBranchProtectionRuleInput, RuleSummary, UpdateBranchProtectionRuleInput,
};

pub mod graphql;
pub use graphql::{GraphQlError, GraphQlResponse, Variable, Variables};

pub mod installation;
pub use installation::fetch_installation_token;

pub mod models;
pub use models::{Connection, PageInfo, RepositoryRef};

pub mod user;
pub use user::User;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The GitHub.com API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";

/// Transport for GraphQL documents.
///
/// Implementations post a document plus variables to the GraphQL endpoint and
/// return the unwrapped `data` payload. Errors reported inside the response
/// envelope surface as [`Error::GraphQl`].
#[async_trait]
pub trait GraphQlClient: Send + Sync {
    /// Runs a query document with the given variables.
    async fn query(&self, document: &str, variables: &Variables) -> Result<Value, Error>;

    /// Runs a mutation document, binding `input` to the `$input` variable.
    async fn mutate(&self, document: &str, input: Value) -> Result<Value, Error>;
}

/// A client for the GitHub GraphQL API backed by octocrab.
///
/// The client is immutable after construction and can be shared freely
/// between operations.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
    graphql_url: Url,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an authenticated octocrab instance.
    ///
    /// # Arguments
    ///
    /// * `client` - An authenticated `Octocrab` client.
    /// * `graphql_url` - The absolute URL of the GraphQL endpoint.
    pub fn new(client: Octocrab, graphql_url: Url) -> Self {
        Self {
            client,
            graphql_url,
        }
    }

    /// Returns the GraphQL endpoint this client posts to.
    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    #[instrument(skip(self, variables), fields(endpoint = %self.graphql_url))]
    async fn execute(&self, document: &str, variables: Value) -> Result<Value, Error> {
        let body = graphql::request_body(document, variables);

        debug!("Posting GraphQL document");
        let response: OctocrabResult<GraphQlResponse> =
            self.client.post(self.graphql_url.as_str(), Some(&body)).await;

        match response {
            Ok(envelope) => envelope.into_data().map_err(|e| {
                debug!(error = %e, "GraphQL response carried errors");
                e
            }),
            Err(e) => {
                let mapped = map_octocrab_error(self.graphql_url.as_str(), &e);
                log_octocrab_error("GraphQL request failed", e);
                Err(mapped)
            }
        }
    }
}

#[async_trait]
impl GraphQlClient for GitHubClient {
    async fn query(&self, document: &str, variables: &Variables) -> Result<Value, Error> {
        let variables = serde_json::to_value(variables)?;
        self.execute(document, variables).await
    }

    async fn mutate(&self, document: &str, input: Value) -> Result<Value, Error> {
        self.execute(document, serde_json::json!({ "input": input }))
            .await
    }
}

/// Derives the GraphQL endpoint from the API base URL.
///
/// `https://api.github.com/` becomes `https://api.github.com/graphql` and an
/// enterprise root such as `https://ghe.example.com/api` becomes
/// `https://ghe.example.com/api/graphql`.
///
/// # Errors
///
/// Returns `Error::Transport` if `base_url` is not a valid absolute URL.
pub fn graphql_endpoint(base_url: &str) -> Result<Url, Error> {
    let mut base = Url::parse(base_url).map_err(|e| Error::Transport {
        endpoint: base_url.to_string(),
        message: format!("Invalid base URL: {}", e),
    })?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join("graphql").map_err(|e| Error::Transport {
        endpoint: base_url.to_string(),
        message: format!("Invalid GraphQL endpoint: {}", e),
    })
}

/// Creates a `GitHubClient` that authenticates every request with `token`.
///
/// # Arguments
///
/// * `base_url` - The GitHub API root, e.g. [`DEFAULT_BASE_URL`].
/// * `token` - A personal access token or an installation token.
///
/// # Errors
///
/// Returns `Error::Transport` for an invalid base URL and `Error::AuthError`
/// if the underlying HTTP client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, DEFAULT_BASE_URL};
///
/// let client = create_token_client(DEFAULT_BASE_URL, "ghp_example").unwrap();
/// assert_eq!(client.graphql_url().as_str(), "https://api.github.com/graphql");
/// ```
#[instrument(skip(token))]
pub fn create_token_client(base_url: &str, token: &str) -> Result<GitHubClient, Error> {
    let graphql_url = graphql_endpoint(base_url)?;

    let octocrab = Octocrab::builder()
        .base_uri(base_url)
        .map_err(|e| {
            error!(base_url = base_url, error = %e, "Invalid base URI for GitHub client");
            Error::AuthError(format!("Invalid base URI: {}", e))
        })?
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build Octocrab client with token credentials");
            Error::AuthError("Failed to build the GitHub client.".to_string())
        })?;

    Ok(GitHubClient::new(octocrab, graphql_url))
}

fn map_octocrab_error(endpoint: &str, e: &octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
            Error::NotFound
        }
        octocrab::Error::GitHub { source, .. } => Error::Transport {
            endpoint: endpoint.to_string(),
            message: format!("{} ({})", source.message, source.status_code),
        },
        octocrab::Error::Json { source, .. } => Error::Transport {
            endpoint: endpoint.to_string(),
            message: format!("Unparseable response: {}", source),
        },
        _ => Error::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        },
    }
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                status = err.status_code.as_u16(),
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
