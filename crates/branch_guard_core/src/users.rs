//! User and token lookups.
//!
//! These back the read-only commands used to find the node ids that go into
//! `actor_ids`.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use github_client::graphql::query_as;
use github_client::user::{UserData, USER_QUERY};
use github_client::{GraphQlClient, User, Variable, Variables};
use secrecy::SecretString;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::errors::{ProtectionError, ProtectionResult};

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

/// Message GitHub reports for a login that does not exist.
pub const MISSING_USER_MESSAGE: &str = "Could not resolve to a User with the login of";

/// The outcome of a batch user lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UsersLookup {
    /// Stable id derived from the node ids of the users found
    pub id: String,
    /// Users in the order their logins were given
    pub users: Vec<User>,
}

/// The token the client is configured with.
#[derive(Clone, Debug)]
pub struct TokenInfo {
    /// `<organization>/token`
    pub id: String,
    pub token: SecretString,
}

/// Looks up a single user by login.
///
/// # Errors
///
/// `ProtectionError::UserNotFound` if GitHub knows no such login.
#[instrument(skip(client))]
pub async fn lookup_user(client: &dyn GraphQlClient, login: &str) -> ProtectionResult<User> {
    fetch_user(client, login)
        .await?
        .ok_or_else(|| ProtectionError::UserNotFound {
            login: login.to_string(),
        })
}

/// Looks up several users, one request per login.
///
/// With `ignore_missing` set, logins GitHub cannot resolve are skipped;
/// every other error still fails the whole lookup.
#[instrument(skip(client, logins), fields(count = logins.len()))]
pub async fn lookup_users(
    client: &dyn GraphQlClient,
    logins: &[String],
    ignore_missing: bool,
) -> ProtectionResult<UsersLookup> {
    let mut users = Vec::with_capacity(logins.len());

    for login in logins {
        match fetch_user(client, login).await? {
            Some(user) => users.push(user),
            None if ignore_missing => {
                warn!(login = login.as_str(), "Skipping unknown user");
            }
            None => {
                return Err(ProtectionError::UserNotFound {
                    login: login.clone(),
                })
            }
        }
    }

    let ids: Vec<&str> = users.iter().map(|user| user.id.as_str()).collect();
    let id = users_id(&ids);

    info!(found = users.len(), id = id.as_str(), "Resolved users");
    Ok(UsersLookup { id, users })
}

/// Describes the configured token.
pub fn token_info(organization: &str, token: SecretString) -> TokenInfo {
    TokenInfo {
        id: format!("{}/token", organization),
        token,
    }
}

/// `users#` followed by the URL-safe base64 SHA-256 of the ids joined with `-`.
///
/// Ids recorded by tools that hash the same list with SHA-1 will not match;
/// state carried over from them gets a new id on its next read.
pub fn users_id(ids: &[&str]) -> String {
    let digest = Sha256::digest(ids.join("-").as_bytes());
    format!("users#{}", URL_SAFE.encode(digest))
}

/// `Ok(None)` when the login does not resolve to a user.
async fn fetch_user(client: &dyn GraphQlClient, login: &str) -> ProtectionResult<Option<User>> {
    let mut variables = Variables::new();
    variables.insert("login".to_string(), Variable::string(login));

    match query_as::<UserData>(client, USER_QUERY, &variables).await {
        Ok(data) => Ok(data.user),
        Err(e) if e.has_message_containing(MISSING_USER_MESSAGE) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
