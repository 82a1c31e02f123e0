// SPDX-License-Identifier: Apache-2.0

//! Error types for safe-intake.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Only [`InvalidInput`] and [`ConfigurationError`] are allowed to abort a run;
//! [`FetchError`] and [`PersistError::Database`] are logged where they happen
//! and handed back so the caller can discard them explicitly.

use std::fmt::{self, Write as _};

use thiserror::Error;

/// Errors that can end a safe-intake run or its setup.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The console input failed the name allowlist.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// Required deployment configuration is missing.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Reading the name or writing the prompt failed.
    #[error("Console I/O failed")]
    Console(#[source] std::io::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// Configuration file or environment override error.
    #[error("Settings error: {message}")]
    Settings {
        /// Error message.
        message: String,
    },
}

impl From<config::ConfigError> for IntakeError {
    fn from(err: config::ConfigError) -> Self {
        IntakeError::Settings {
            message: err.to_string(),
        }
    }
}

/// Why a name was rejected.
///
/// Deliberately carries no part of the rejected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after trimming.
    Empty,
    /// Longer than the allowed number of characters.
    TooLong {
        /// Character count of the trimmed input.
        length: usize,
    },
    /// Contains something other than letters, whitespace, hyphens and apostrophes.
    DisallowedCharacters,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "name is empty"),
            Rejection::TooLong { length } => {
                write!(f, "name is {length} characters long")
            }
            Rejection::DisallowedCharacters => write!(f, "name contains disallowed characters"),
        }
    }
}

/// The console input did not match the name allowlist.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid name format ({reason})")]
pub struct InvalidInput {
    /// Reason for the rejection.
    pub reason: Rejection,
}

impl InvalidInput {
    /// Creates an `InvalidInput` for the given reason.
    #[must_use]
    pub fn new(reason: Rejection) -> Self {
        Self { reason }
    }
}

/// Deployment configuration defects that must not be swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// One or more database credential variables are unset or blank.
    #[error("Database credentials are not set in environment (missing: {})", .missing.join("/"))]
    MissingCredentials {
        /// Names of the missing environment variables.
        missing: Vec<&'static str>,
    },
}

/// Failure inside the remote fetcher. Never aborts a run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connecting, sending, or receiving the response head failed.
    #[error("Request failed")]
    Request(#[source] reqwest::Error),

    /// Reading the response body failed part way.
    #[error("Failed reading response body (HTTP {status})")]
    Body {
        /// HTTP status of the response.
        status: u16,
        /// Underlying read error.
        #[source]
        source: reqwest::Error,
    },

    /// The server sent no usable body.
    #[error("No response body from server (HTTP {status})")]
    NoBody {
        /// HTTP status of the response.
        status: u16,
    },

    /// The server answered with an error status and an error body.
    #[error("Server returned HTTP {status}")]
    Status {
        /// HTTP status of the response.
        status: u16,
    },
}

/// Failure inside the persistence writer.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Credentials were missing; raised before any connection attempt.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Connecting, preparing, or executing failed. Already logged by the writer.
    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl PersistError {
    /// Returns true if this error must abort the run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, PersistError::Configuration(_))
    }
}

/// Renders an error and all of its sources as `outer: inner: root`.
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, ": {cause}");
        source = cause.source();
    }
    rendered
}
