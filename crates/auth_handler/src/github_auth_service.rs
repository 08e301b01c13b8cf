//! GitHub authentication service implementation
//!
//! Provides the concrete [`TokenProvider`] for static tokens and GitHub App
//! installations, and the helper that turns it into a ready client.

use crate::{AuthError, AuthResult, Credentials, TokenProvider};
use async_trait::async_trait;
use github_client::{create_token_client, fetch_installation_token, GitHubClient};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

/// GitHub authentication service
///
/// # Examples
///
/// ```rust,no_run
/// use auth_handler::{Credentials, GitHubAuthService, TokenProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::resolve(Some("ghp_example".to_string()), None)?;
/// let auth_service = GitHubAuthService::new("https://api.github.com/", credentials);
///
/// let token = auth_service.token().await?;
/// # Ok(())
/// # }
/// ```
pub struct GitHubAuthService {
    base_url: String,
    credentials: Credentials,
}

impl GitHubAuthService {
    /// Create a new authentication service
    ///
    /// # Parameters
    /// - `base_url`: GitHub API root, used to locate the installation token endpoint
    /// - `credentials`: the resolved credential mode
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl TokenProvider for GitHubAuthService {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn token(&self) -> AuthResult<SecretString> {
        match &self.credentials {
            Credentials::Token(token) => Ok(token.clone()),
            Credentials::App(app) => {
                info!(
                    app_id = %app.app_id,
                    installation_id = %app.installation_id,
                    "Requesting GitHub App installation token"
                );

                fetch_installation_token(
                    &self.base_url,
                    &app.app_id,
                    &app.installation_id,
                    app.private_key.expose_secret(),
                )
                .await
                .map_err(|e| match e {
                    github_client::Error::AuthError(msg) => AuthError::InvalidPrivateKey(msg),
                    other => AuthError::GitHubError(format!(
                        "error returning GitHub App installation token: {}",
                        other
                    )),
                })
            }
        }
    }
}

impl std::fmt::Debug for GitHubAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthService")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Builds a GraphQL client authenticated with the token from `provider`.
///
/// # Errors
/// Propagates token errors; returns `AuthError::GitHubError` if the client
/// cannot be constructed for `base_url`.
#[instrument(skip(provider))]
pub async fn authenticated_client(
    base_url: &str,
    provider: &dyn TokenProvider,
) -> AuthResult<GitHubClient> {
    let token = provider.token().await?;

    create_token_client(base_url, token.expose_secret())
        .map_err(|e| AuthError::GitHubError(format!("Failed to create GitHub client: {}", e)))
}
