// SPDX-License-Identifier: Apache-2.0

//! safe-intake - read a name, fetch remote data, store it, log a notification.
//!
//! Each run is linear and single-threaded. Failures surface only in the log
//! on stderr; the process exits normally either way.

mod cli;
mod errors;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use safe_intake_core::{
    Credentials, LogNotifier, PersistenceWriter, Pipeline, RemoteFetcher, RunOutcome, load_config,
};
use tracing::{debug, error, info};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli).await {
        Ok(RunOutcome::Completed) => debug!("Exiting after completed run"),
        Ok(RunOutcome::Aborted { stage, error }) => {
            debug!(%stage, "Exiting after aborted run");
            if let Some(tip) = errors::hint(&error) {
                info!("{tip}");
            }
        }
        Err(e) => {
            let formatted = errors::format_error(&e);
            error!("Unexpected error: {formatted}");
        }
    }
}

/// Builds the components once and performs a single run.
async fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(url = %config.fetch.url, "Configuration loaded successfully");

    // Read once at startup and handed to the writer
    let credentials = Credentials::from_env();

    let fetcher = RemoteFetcher::new(&config.fetch).context("Failed to create fetcher")?;
    let writer = PersistenceWriter::new(credentials);
    let notifier = LogNotifier;

    let pipeline = Pipeline::new(&fetcher, &writer, &notifier, &config.notify);
    let outcome = pipeline
        .run(std::io::stdin().lock(), std::io::stdout().lock())
        .await;

    Ok(outcome)
}
