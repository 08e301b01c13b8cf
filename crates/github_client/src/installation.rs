//! GitHub App installation token exchange.
//!
//! When no static token is configured the client authenticates as a GitHub App
//! installation: a short lived JWT signed with the app's private key is traded
//! for an installation access token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::Error;

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;

/// Media type required by the installation token endpoint.
pub const INSTALLATION_TOKEN_ACCEPT: &str = "application/vnd.github.machine-man-preview+json";

const JWT_LIFETIME_SECONDS: i64 = 10;

const CLIENT_USER_AGENT: &str = concat!("branch-guard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize)]
struct JWTClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Replaces literal `\n` sequences with newlines.
///
/// PEM keys passed through environment variables commonly arrive with their
/// line breaks escaped.
pub fn normalize_pem(pem: &str) -> String {
    pem.replace("\\n", "\n")
}

/// Signs the JWT a GitHub App presents to request an installation token.
///
/// The claims are `iss = app_id`, `iat = now` and `exp = now + 10s`.
///
/// # Errors
///
/// Returns `Error::AuthError` if the private key is not a valid RSA PEM or the
/// token cannot be signed.
pub fn sign_app_jwt(app_id: &str, private_key: &str, now: DateTime<Utc>) -> Result<String, Error> {
    let key = EncodingKey::from_rsa_pem(normalize_pem(private_key).as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let claims = JWTClaims {
        iat: now.timestamp(),
        exp: (now + Duration::seconds(JWT_LIFETIME_SECONDS)).timestamp(),
        iss: app_id.to_string(),
    };

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| Error::AuthError(format!("Failed to sign the app JWT. Error was: {}", e)))
}

/// Builds `{scheme}://{host}/app/installations/{id}/access_tokens` from the API base URL.
///
/// Only the scheme, host and port of `base_url` are kept; enterprise path
/// prefixes such as `/api/v3` are dropped.
pub fn installation_token_url(base_url: &str, installation_id: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url).map_err(|e| Error::Transport {
        endpoint: base_url.to_string(),
        message: format!("Invalid base URL: {}", e),
    })?;

    url.set_path(&format!("/app/installations/{}/access_tokens", installation_id));
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Exchanges a GitHub App JWT for an installation access token.
///
/// # Arguments
///
/// * `base_url` - The GitHub API base URL, e.g. `https://api.github.com/`.
/// * `app_id` - The ID of the GitHub App.
/// * `installation_id` - The installation to request a token for.
/// * `private_key` - The app's private key in PEM format.
///
/// # Errors
///
/// - `Error::AuthError` if the key cannot be parsed or the JWT cannot be signed
/// - `Error::Transport` if the endpoint cannot be reached or the body is not JSON
/// - `Error::UnexpectedStatus` if the endpoint answers with anything but `201 Created`
#[instrument(skip(private_key))]
pub async fn fetch_installation_token(
    base_url: &str,
    app_id: &str,
    installation_id: &str,
    private_key: &str,
) -> Result<SecretString, Error> {
    let bearer = sign_app_jwt(app_id, private_key, Utc::now())?;
    let url = installation_token_url(base_url, installation_id)?;
    let endpoint = url.to_string();

    debug!(endpoint = %endpoint, "Requesting installation token");

    let response = reqwest::Client::new()
        .post(url)
        .header(AUTHORIZATION, format!("Bearer {}", bearer))
        .header(ACCEPT, INSTALLATION_TOKEN_ACCEPT)
        .header(USER_AGENT, CLIENT_USER_AGENT)
        .send()
        .await
        .map_err(|e| {
            error!(endpoint = %endpoint, error = %e, "Failed to reach the installation token endpoint");
            Error::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            }
        })?;

    let status = response.status();
    if status != StatusCode::CREATED {
        error!(
            endpoint = %endpoint,
            status = status.as_u16(),
            "Installation token endpoint did not create a token"
        );
        return Err(Error::UnexpectedStatus {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body: TokenResponse = response.json().await.map_err(|e| Error::Transport {
        endpoint: endpoint.clone(),
        message: format!("Failed to parse token response: {}", e),
    })?;

    info!(
        app_id = app_id,
        installation_id = installation_id,
        "Created access token for installation"
    );

    Ok(SecretString::from(body.token))
}
