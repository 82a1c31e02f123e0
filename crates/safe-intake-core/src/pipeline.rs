// SPDX-License-Identifier: Apache-2.0

//! One linear run: validate, fetch, persist, notify.
//!
//! Only an invalid name or missing database credentials abort a run. Fetch
//! and database failures are logged by their components and discarded here
//! explicitly, so the later steps still happen.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, error, info};

use crate::config::NotifyConfig;
use crate::error::{IntakeError, PersistError, error_chain};
use crate::fetcher::{DocumentSource, FetchFailure};
use crate::notifier::{Notification, Notifier};
use crate::store::DocumentSink;
use crate::validator::read_validated_name;

/// Step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and validating the name.
    Validate,
    /// Fetching the remote document.
    Fetch,
    /// Writing the document.
    Persist,
    /// Logging the notification.
    Notify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Fetch => "fetch",
            Stage::Persist => "persist",
            Stage::Notify => "notify",
        };
        f.write_str(name)
    }
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum RunOutcome {
    /// All four steps ran.
    Completed,
    /// The run stopped at `stage`; later steps did not run.
    Aborted {
        /// Step that failed.
        stage: Stage,
        /// Why it failed.
        error: IntakeError,
    },
}

impl RunOutcome {
    /// Returns true if the run reached the notify step and finished.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Wires the four steps together for a single run.
pub struct Pipeline<'a> {
    source: &'a dyn DocumentSource,
    sink: &'a dyn DocumentSink,
    notifier: &'a dyn Notifier,
    notify: &'a NotifyConfig,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over the given components.
    #[must_use]
    pub fn new(
        source: &'a dyn DocumentSource,
        sink: &'a dyn DocumentSink,
        notifier: &'a dyn Notifier,
        notify: &'a NotifyConfig,
    ) -> Self {
        Self {
            source,
            sink,
            notifier,
            notify,
        }
    }

    /// Runs once. Aborts are logged at error severity before returning.
    ///
    /// # Arguments
    ///
    /// * `input` - Console input, consumed by the validate step
    /// * `prompt` - Console output for the name prompt
    pub async fn run<R, W>(&self, input: R, prompt: W) -> RunOutcome
    where
        R: BufRead,
        W: Write,
    {
        debug!(stage = %Stage::Validate, "Run started");
        let name = match read_validated_name(input, prompt) {
            Ok(name) => name,
            Err(IntakeError::InvalidInput(e)) => {
                error!("Invalid input: {e}");
                return RunOutcome::Aborted {
                    stage: Stage::Validate,
                    error: e.into(),
                };
            }
            Err(e) => return abort(Stage::Validate, e),
        };

        debug!(stage = %Stage::Fetch, "Name accepted");
        let document = self
            .source
            .fetch()
            .await
            .unwrap_or_else(FetchFailure::into_partial);

        debug!(stage = %Stage::Persist, bytes = document.as_str().len(), "Fetch finished");
        match self.sink.save(document.as_str()).await {
            Ok(()) => {}
            // Logged by the writer; the run continues to notify
            Err(PersistError::Database(_)) => {}
            Err(PersistError::Configuration(e)) => return abort(Stage::Persist, e.into()),
        }

        debug!(stage = %Stage::Notify, "Persist finished");
        self.notifier
            .notify(&Notification::from_config(self.notify, name.into_string()));

        info!("Run completed");
        RunOutcome::Completed
    }
}

fn abort(stage: Stage, error: IntakeError) -> RunOutcome {
    error!(%stage, error = %error_chain(&error), "Run aborted");
    RunOutcome::Aborted { stage, error }
}
