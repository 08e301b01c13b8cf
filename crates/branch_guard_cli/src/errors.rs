use std::io;

use auth_handler::AuthError;
use branch_guard_core::ProtectionError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the BranchGuard CLI application.
///
/// This enum represents all possible error conditions that can arise during
/// CLI operations, including credential failures, configuration issues,
/// and I/O problems.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials could not be resolved or exchanged for a token.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when there are issues with the configuration file,
    /// such as missing required fields, invalid values, or file access problems.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file.")]
    LoadFile(#[source] io::Error),

    /// Failed to parse a TOML rule or configuration file.
    #[error("Failed to parse TOML file: {0}")]
    ParseTomlFile(#[source] toml::de::Error),

    /// Failed to parse a JSON rule file.
    #[error("Failed to parse JSON file: {0}")]
    ParseJsonFile(#[source] serde_json::Error),

    /// A reconciliation or lookup operation failed.
    #[error(transparent)]
    Protection(#[from] ProtectionError),

    /// The result could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[source] serde_json::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// `3` means the rule no longer exists, so scripts can drop their stored id.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Protection(e) if e.is_not_found() => 3,
            Error::Protection(ProtectionError::Configuration(_))
            | Error::Config(_)
            | Error::LoadFile(_)
            | Error::ParseTomlFile(_)
            | Error::ParseJsonFile(_) => 2,
            _ => 1,
        }
    }
}
