//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the GitHub
//! GraphQL API through the github_client crate. Transport failures, GraphQL level
//! errors and decoding problems are kept apart so that callers can decide whether
//! a failure means "the object is gone" or "the call did not work".

use crate::graphql::GraphQlError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// The GraphQL error type GitHub uses for unresolvable node ids and logins.
pub const NOT_FOUND_ERROR_TYPE: &str = "NOT_FOUND";

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.query(QUERY, variables).await {
///     Ok(data) => println!("{data}"),
///     Err(e) if e.is_not_found() => eprintln!("The object no longer exists"),
///     Err(Error::Transport { endpoint, message }) => eprintln!("{endpoint}: {message}"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The private key of a GitHub App cannot be parsed
    /// - A JWT cannot be signed
    /// - The HTTP client cannot be built
    ///
    /// The contained string provides specific details about the failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    ///
    /// The GraphQL response did not have the shape requested by the query
    /// document, which usually means the document and the model drifted apart.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GraphQL endpoint answered with one or more errors.
    ///
    /// These are semantic failures reported by the API itself, for instance
    /// "Could not resolve to a User with the login of 'x'".
    #[error("GitHub GraphQL request failed: {}", summarize(.0))]
    GraphQl(Vec<GraphQlError>),

    /// The installation token endpoint did not answer with `201 Created`.
    #[error("Status code returned ({status}) by {endpoint} is not 201")]
    UnexpectedStatus { endpoint: String, status: u16 },

    /// The GitHub API returned a response in an unexpected format.
    ///
    /// For GraphQL this means the envelope carried neither `data` nor `errors`.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    #[error("Resource not found")]
    NotFound,

    /// The request never produced a usable HTTP response.
    ///
    /// Covers connection failures, invalid URIs and non-2xx answers from the
    /// GraphQL endpoint. The endpoint is kept for diagnostics.
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
}

impl Error {
    /// Returns `true` when the error states that the requested object does not exist.
    ///
    /// GitHub reports unknown node ids either as an HTTP 404 or as a GraphQL
    /// error of type `NOT_FOUND` next to a `null` payload.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound => true,
            Error::GraphQl(errors) => errors
                .iter()
                .any(|e| e.error_type.as_deref() == Some(NOT_FOUND_ERROR_TYPE)),
            _ => false,
        }
    }

    /// Returns `true` when any of the GraphQL error messages contains `needle`.
    pub fn has_message_containing(&self, needle: &str) -> bool {
        match self {
            Error::GraphQl(errors) => errors.iter().any(|e| e.message.contains(needle)),
            _ => false,
        }
    }
}

fn summarize(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
