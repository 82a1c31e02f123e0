// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the safe-intake CLI.
//!
//! Uses `tracing` with `tracing-subscriber`. Log lines go to stderr so the
//! name prompt on stdout stays clean. Log level can be controlled via the
//! `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: info for safe-intake, warn for dependencies
//! safe-intake
//!
//! # Debug output for troubleshooting
//! safe-intake --verbose
//! RUST_LOG=safe_intake_core=debug,sqlx=info safe-intake
//! ```

use std::io::IsTerminal;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default directives when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "safe_intake=info,safe_intake_core=info,sqlx=warn,reqwest=warn";

/// Default directives with `--verbose`.
const VERBOSE_FILTER: &str = "safe_intake=debug,safe_intake_core=debug,sqlx=warn,reqwest=warn";

/// Returns the filter directives used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - Raise safe-intake's own targets to debug (-v flag)
pub fn init_logging(verbose: bool) {
    let stderr = std::io::stderr();
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(stderr.is_terminal())
        .with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
