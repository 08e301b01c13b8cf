//! User domain types.
//!
//! This module contains the GraphQL document and shape used to look up a
//! GitHub user account by login.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;

pub const USER_QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        id
        login
        name
        isSiteAdmin
    }
}
"#;

/// Represents a GitHub user account.
///
/// # Examples
///
/// ```rust
/// use github_client::User;
///
/// let user = User {
///     id: "MDQ6VXNlcjU4MzIzMQ==".to_string(),
///     login: "octocat".to_string(),
///     name: Some("The Octocat".to_string()),
///     is_site_admin: false,
/// };
///
/// println!("User: {} (ID: {})", user.login, user.id);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The GraphQL node ID of the user
    pub id: String,
    /// The login name of the user
    pub login: String,
    /// The display name, `null` when the profile has none
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_site_admin: bool,
}

/// Response data of [`USER_QUERY`].
#[derive(Clone, Debug, Deserialize)]
pub struct UserData {
    pub user: Option<User>,
}
