//! Authentication handler for BranchGuard
//!
//! This crate resolves the credentials the GitHub client runs with. Two modes
//! are supported:
//! - a static bearer token (personal access token or pre-issued installation token)
//! - a GitHub App, traded for an installation token at startup
//!
//! ## Architecture
//!
//! Business logic depends on the [`TokenProvider`] trait; [`GitHubAuthService`]
//! implements it on top of `github_client`. The resulting client handle is
//! built once and shared read-only by every operation.

use async_trait::async_trait;
use secrecy::SecretString;

mod github_auth_service;

pub use github_auth_service::{authenticated_client, GitHubAuthService};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while resolving credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials provided: {0}")]
    InvalidCredentials(String),

    #[error("No credentials configured: set a token or a GitHub App installation")]
    MissingCredentials,

    #[error("Invalid GitHub App private key: {0}")]
    InvalidPrivateKey(String),

    #[error("GitHub API error: {0}")]
    GitHubError(String),
}

/// GitHub App credentials used to mint installation tokens.
#[derive(Clone)]
pub struct AppCredentials {
    /// GitHub App ID, used as the JWT issuer
    pub app_id: String,
    /// Installation the token is requested for
    pub installation_id: String,
    /// Private key in PEM format; escaped `\n` sequences are accepted
    pub private_key: SecretString,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}

/// The credentials a client is built with.
#[derive(Clone, Debug)]
pub enum Credentials {
    /// A static bearer token
    Token(SecretString),
    /// A GitHub App installation
    App(AppCredentials),
}

impl Credentials {
    /// Picks the credential mode from the configured values.
    ///
    /// A non-empty token always wins. Without one, a complete app
    /// configuration is used.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` if the app configuration is incomplete
    /// - `AuthError::MissingCredentials` if neither mode is configured
    pub fn resolve(token: Option<String>, app: Option<AppCredentials>) -> AuthResult<Self> {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            return Ok(Credentials::Token(SecretString::from(token)));
        }

        match app {
            Some(app) if app.installation_id.trim().is_empty() => Err(
                AuthError::InvalidCredentials("app installation id is empty".to_string()),
            ),
            Some(app) if app.app_id.trim().is_empty() => Err(AuthError::InvalidCredentials(
                "app id is empty".to_string(),
            )),
            Some(app) => Ok(Credentials::App(app)),
            None => Err(AuthError::MissingCredentials),
        }
    }
}

/// Source of the bearer token the GitHub client authenticates with.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a token usable for GraphQL requests
    ///
    /// # Errors
    /// Returns `AuthError::InvalidPrivateKey` for malformed app keys and
    /// `AuthError::GitHubError` if the token exchange fails
    async fn token(&self) -> AuthResult<SecretString>;
}
