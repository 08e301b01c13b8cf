//! Error types for branch protection reconciliation.
//!
//! Configuration problems are reported before anything reaches GitHub and are
//! kept apart from remote failures so callers can tell a bad input from a bad
//! request.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type alias for reconciliation operations.
pub type ProtectionResult<T> = Result<T, ProtectionError>;

/// Problems with a desired configuration, detected locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A block that may be declared at most once was declared several times
    #[error("error multiple {block} declarations")]
    MultipleDeclarations { block: String },

    #[error("required_approving_review_count must be between {min} and {max}, got {actual}")]
    ReviewCountOutOfRange { actual: i32, min: i32, max: i32 },

    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },
}

impl ConfigurationError {
    pub fn multiple_declarations(block: impl Into<String>) -> Self {
        Self::MultipleDeclarations {
            block: block.into(),
        }
    }

    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }
}

/// Errors surfaced by the reconciliation operations.
#[derive(Error, Debug)]
pub enum ProtectionError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The rule no longer exists; callers should drop their stored id
    #[error("Branch protection rule '{id}' not found")]
    NotFound { id: String },

    /// An allowance actor had both the team and the user slot populated
    #[error("Actor is both a team ('{team_id}') and a user ('{user_id}')")]
    ActorConflict { team_id: String, user_id: String },

    #[error("Pattern '{pattern}' matches {count} branch protection rules in '{repository}'")]
    AmbiguousPattern {
        repository: String,
        pattern: String,
        count: usize,
    },

    #[error("Repository '{owner}/{repository}' not found")]
    RepositoryNotFound { owner: String, repository: String },

    #[error("Could not resolve to a User with the login of '{login}'")]
    UserNotFound { login: String },

    /// The rule was written but reading it back failed; `id` is the new rule
    #[error("Branch protection rule '{id}' was written but could not be read back: {source}")]
    ReadBack {
        id: String,
        #[source]
        source: Box<ProtectionError>,
    },

    /// A mutation answered without the expected payload
    #[error("GitHub returned no {operation} payload")]
    MissingPayload { operation: String },

    #[error("GitHub request failed: {0}")]
    GitHub(#[from] github_client::Error),
}

impl ProtectionError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn missing_payload(operation: impl Into<String>) -> Self {
        Self::MissingPayload {
            operation: operation.into(),
        }
    }

    /// Whether the error means the rule is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
