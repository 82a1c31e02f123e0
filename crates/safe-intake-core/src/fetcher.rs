// SPDX-License-Identifier: Apache-2.0

//! Bounded-timeout HTTPS fetch of a fixed endpoint.
//!
//! The fetcher never aborts a run. Every failure is logged here and returned
//! as a [`FetchFailure`] carrying whatever text was read, so the caller
//! discards the error explicitly and keeps going.
//!
//! Redirects are never followed: a 3xx answer is reported as "no body" and
//! yields an empty document.

use async_trait::async_trait;
use reqwest::{Client, Response, redirect};
use tracing::{debug, error, instrument, warn};

use crate::config::FetchConfig;
use crate::error::{FetchError, IntakeError, error_chain};

/// Raw response text. Opaque, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteDocument(String);

impl RemoteDocument {
    /// Wraps fetched text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the fetched text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fetch that went wrong, plus the text accumulated before it did.
#[derive(Debug)]
pub struct FetchFailure {
    /// Text read before the failure (error body, completed lines, or empty).
    pub partial: RemoteDocument,
    /// What went wrong. Already logged by the fetcher.
    pub error: FetchError,
}

impl FetchFailure {
    fn new(partial: impl Into<String>, error: FetchError) -> Self {
        Self {
            partial: RemoteDocument::new(partial),
            error,
        }
    }

    /// Drops the error and keeps the partial text.
    #[must_use]
    pub fn into_partial(self) -> RemoteDocument {
        self.partial
    }
}

/// Source of the document persisted by a run.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the document once.
    async fn fetch(&self) -> Result<RemoteDocument, FetchFailure>;
}

/// HTTP fetcher for the configured endpoint.
#[derive(Debug)]
pub struct RemoteFetcher {
    http: Client,
    url: String,
}

impl RemoteFetcher {
    /// Creates a fetcher with connect/read timeouts and redirects disabled.
    ///
    /// The URL scheme is checked by [`FetchConfig::validate`] when loading
    /// configuration, not here.
    pub fn new(config: &FetchConfig) -> crate::Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(IntakeError::HttpClient)?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    /// Returns the endpoint this fetcher targets.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_inner(&self) -> Result<RemoteDocument, FetchFailure> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchFailure::new(String::new(), FetchError::Request(e)))?;

        let status = response.status();
        let code = status.as_u16();

        if status.is_success() {
            let text = read_lines(response)
                .await
                .map_err(|(partial, source)| {
                    FetchFailure::new(partial, FetchError::Body { status: code, source })
                })?;
            return Ok(RemoteDocument::new(text));
        }

        // Only 4xx/5xx answers carry an error body worth reading
        if !(status.is_client_error() || status.is_server_error()) {
            return Err(FetchFailure::new(String::new(), FetchError::NoBody { status: code }));
        }

        match read_lines(response).await {
            Ok(text) if text.is_empty() => {
                Err(FetchFailure::new(text, FetchError::NoBody { status: code }))
            }
            Ok(text) => Err(FetchFailure::new(text, FetchError::Status { status: code })),
            Err((partial, source)) => Err(FetchFailure::new(
                partial,
                FetchError::Body {
                    status: code,
                    source,
                },
            )),
        }
    }
}

#[async_trait]
impl DocumentSource for RemoteFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<RemoteDocument, FetchFailure> {
        let result = self.fetch_inner().await;

        match &result {
            Ok(document) => debug!(bytes = document.as_str().len(), "Fetched remote data"),
            Err(failure) => match &failure.error {
                FetchError::NoBody { status } => {
                    warn!(status, "No response body from server");
                }
                FetchError::Status { status } => {
                    warn!(
                        status,
                        bytes = failure.partial.as_str().len(),
                        "Server returned an error status; using error body"
                    );
                }
                FetchError::Request(_) | FetchError::Body { .. } => {
                    error!(error = %error_chain(&failure.error), "Error fetching data");
                }
            },
        }

        result
    }
}

/// Reads the body chunk by chunk, joining lines without their terminators.
///
/// On a read error returns the completed lines together with the error.
async fn read_lines(mut response: Response) -> Result<String, (String, reqwest::Error)> {
    let mut lines = LineAccumulator::default();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => lines.push(&chunk),
            Ok(None) => return Ok(lines.finish()),
            Err(e) => return Err((lines.abandon(), e)),
        }
    }
}

/// Concatenates lines split on `\n`, `\r` or `\r\n`, dropping the terminators.
///
/// Terminators may straddle chunk boundaries.
#[derive(Debug, Default)]
struct LineAccumulator {
    text: String,
    line: Vec<u8>,
    after_cr: bool,
}

impl LineAccumulator {
    fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let after_cr = std::mem::take(&mut self.after_cr);
            match byte {
                b'\n' if after_cr => {}
                b'\n' => self.end_line(),
                b'\r' => {
                    self.end_line();
                    self.after_cr = true;
                }
                _ => self.line.push(byte),
            }
        }
    }

    fn end_line(&mut self) {
        self.text.push_str(&String::from_utf8_lossy(&self.line));
        self.line.clear();
    }

    /// Flushes a final unterminated line.
    fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.end_line();
        }
        self.text
    }

    /// Returns completed lines only; an interrupted line is discarded.
    fn abandon(self) -> String {
        self.text
    }
}
