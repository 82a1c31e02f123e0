// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Safe Intake Core
//!
//! Core library for the safe-intake CLI: a single linear run that reads a
//! name, fetches a remote document, stores it, and logs a notification, with
//! each step hardened against a common class of vulnerability.
//!
//! - Allowlist validation of console input (no unvalidated text flows on)
//! - HTTPS fetch with bounded timeouts and redirects disabled
//! - Parameter-bound `INSERT` with credentials from the environment
//! - Notification recorded as a log entry, never a shell command
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use safe_intake_core::{
//!     Credentials, LogNotifier, PersistenceWriter, Pipeline, RemoteFetcher, load_config,
//! };
//!
//! # async fn example() -> safe_intake_core::Result<()> {
//! let config = load_config(None)?;
//! let fetcher = RemoteFetcher::new(&config.fetch)?;
//! let writer = PersistenceWriter::new(Credentials::from_env());
//!
//! let pipeline = Pipeline::new(&fetcher, &writer, &LogNotifier, &config.notify);
//! let outcome = pipeline
//!     .run(std::io::stdin().lock(), std::io::stdout().lock())
//!     .await;
//! println!("completed: {}", outcome.is_completed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`validator`] - Name allowlist and console read
//! - [`fetcher`] - Bounded HTTPS fetch
//! - [`store`] - Parameterized persistence
//! - [`notifier`] - Logged notification
//! - [`pipeline`] - Run orchestration
//! - [`config`] - Configuration loading and paths
//! - [`credentials`] - Database credentials from the environment
//! - [`error`] - Error types

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{
    ConfigurationError, FetchError, IntakeError, InvalidInput, PersistError, Rejection,
    error_chain,
};

/// Convenience Result type for safe-intake operations.
///
/// This is equivalent to `std::result::Result<T, IntakeError>`.
pub type Result<T> = std::result::Result<T, IntakeError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AppConfig, FetchConfig, NotifyConfig, config_dir, config_file_path, load_config};
pub use credentials::{Credentials, ResolvedCredentials};

// ============================================================================
// Run Steps
// ============================================================================

pub use fetcher::{DocumentSource, FetchFailure, RemoteDocument, RemoteFetcher};
pub use notifier::{LogNotifier, Notification, Notifier};
pub use store::{DocumentSink, PLACEHOLDER_VALUE, PersistenceWriter};
pub use validator::{MAX_NAME_LEN, NAME_PROMPT, UserName, read_validated_name, validate_name};

// ============================================================================
// Orchestration
// ============================================================================

pub use pipeline::{Pipeline, RunOutcome, Stage};

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod pipeline;
pub mod store;
pub mod validator;

#[cfg(test)]
mod test_support;
