//! # Models
//!
//! Shared GraphQL shapes used by more than one query: connections, page
//! information and lightweight object references.
//!
//! These models mirror the camelCase JSON GitHub returns and are designed to be
//! deserialized straight out of a GraphQL `data` payload.

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Cursor information returned with every paginated connection.
///
/// # Examples
///
/// ```
/// use github_client::models::PageInfo;
///
/// let info = PageInfo {
///     end_cursor: Some("Y3Vyc29yOjEwMA==".to_string()),
///     has_next_page: true,
/// };
/// assert!(info.has_next_page);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Opaque cursor pointing after the last node of the page
    pub end_cursor: Option<String>,
    /// Whether another page follows this one
    pub has_next_page: bool,
}

/// A GraphQL connection (`{ nodes, pageInfo }`).
///
/// `pageInfo` is only present when the query asked for it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
)]
pub struct Connection<T> {
    /// The nodes on this page
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub nodes: Vec<T>,
    /// Pagination details, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: None,
        }
    }
}

impl<T> Connection<T> {
    /// Builds a connection from nodes without page information.
    pub fn from_nodes(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            page_info: None,
        }
    }
}

/// The repository a branch protection rule belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryRef {
    /// The GraphQL node ID of the repository
    pub id: String,
    /// The name of the repository (without owner)
    pub name: String,
}

/// Deserializes `null` as `T::default()`.
///
/// GitHub returns `null` rather than `[]` for several list fields, e.g.
/// `requiredStatusCheckContexts` on a rule without status checks.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
