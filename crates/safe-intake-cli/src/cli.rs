// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for safe-intake.
//!
//! Uses clap's derive API. There are no subcommands: every invocation is one run.

use std::path::PathBuf;

use clap::Parser;

/// safe-intake - read a name, fetch remote data, store it, log a notification.
///
/// Database credentials are read from `DB_URL`, `DB_USER` and `DB_PASSWORD`.
/// All failures are reported through the log on stderr.
#[derive(Parser)]
#[command(name = "safe-intake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to load instead of the default location
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
