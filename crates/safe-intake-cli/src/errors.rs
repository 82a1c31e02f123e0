// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `IntakeError` and appends a hint for the
//! operator. The library keeps structured error data; wording lives here.

use anyhow::Error;
use safe_intake_core::error::IntakeError;
use safe_intake_core::{ConfigurationError, config_file_path};

/// Returns an operator hint for an error, if there is a useful one.
pub fn hint(error: &IntakeError) -> Option<String> {
    match error {
        IntakeError::Configuration(ConfigurationError::MissingCredentials { missing }) => {
            Some(format!(
                "Tip: export {} before running (e.g. DB_URL=mysql://db.example.com/mydb).",
                missing.join(", ")
            ))
        }
        IntakeError::Settings { .. } => Some(format!(
            "Tip: Check your config file at {} and any SAFE_INTAKE_* variables.",
            config_file_path().display()
        )),
        IntakeError::HttpClient(_) => {
            Some("Tip: The TLS backend could not be initialized on this system.".to_string())
        }
        IntakeError::InvalidInput(_) => Some(
            "Tip: Names may contain only letters, spaces, hyphens and apostrophes (1-64 characters)."
                .to_string(),
        ),
        IntakeError::Console(_) => None,
    }
}

/// Formats an error for the log, with a hint when one applies.
///
/// Includes the full context chain. If the error is not an `IntakeError`,
/// returns the chain alone.
pub fn format_error(error: &Error) -> String {
    let chain = format!("{error:#}");

    match error.downcast_ref::<IntakeError>().and_then(hint) {
        Some(tip) => format!("{chain}\n\n{tip}"),
        None => chain,
    }
}
