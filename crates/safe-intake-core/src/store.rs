// SPDX-License-Identifier: Apache-2.0

//! Parameterized single-row persistence.
//!
//! Writes one `(column1, column2)` row with a prepared, parameter-bound
//! `INSERT`. The statement text is a constant; the fetched data only ever
//! travels as a bound argument.
//!
//! Missing credentials fail fast with [`PersistError::Configuration`] before
//! any connection is attempted. Database failures are logged here and
//! returned as [`PersistError::Database`] for the caller to discard.
//!
//! No timeout is applied to the database call; the driver defaults govern
//! how long a connect or execute may block.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection, Executor, Statement};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::credentials::{Credentials, ResolvedCredentials};
use crate::error::{PersistError, error_chain};

/// Literal stored in the second column of every row.
pub const PLACEHOLDER_VALUE: &str = "Another Value";

const INSERT_POSITIONAL: &str = "INSERT INTO mytable (column1, column2) VALUES (?, ?)";
const INSERT_NUMBERED: &str = "INSERT INTO mytable (column1, column2) VALUES ($1, $2)";

/// Returns the insert statement in the placeholder style of `backend`.
///
/// `backend` is the name reported by the connected driver.
#[must_use]
pub fn insert_statement(backend: &str) -> &'static str {
    if backend.eq_ignore_ascii_case("PostgreSQL") {
        INSERT_NUMBERED
    } else {
        INSERT_POSITIONAL
    }
}

/// Destination of the fetched document.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Stores `data` as one row.
    async fn save(&self, data: &str) -> Result<(), PersistError>;
}

/// Relational writer backed by `sqlx::any` (MySQL, PostgreSQL, SQLite).
#[derive(Debug)]
pub struct PersistenceWriter {
    credentials: Credentials,
}

impl PersistenceWriter {
    /// Creates a writer. Credentials are only checked when saving.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        install_default_drivers();
        Self { credentials }
    }

    async fn insert(creds: ResolvedCredentials<'_>, data: &str) -> Result<(), sqlx::Error> {
        let url = connection_url(creds)?;
        debug!(
            scheme = url.scheme(),
            host = url.host_str().unwrap_or_default(),
            "Connecting to database"
        );

        let mut conn = AnyConnection::connect(url.as_str()).await?;
        let result = insert_row(&mut conn, data).await;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "Failed to close database connection cleanly");
        }

        result
    }
}

#[async_trait]
impl DocumentSink for PersistenceWriter {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn save(&self, data: &str) -> Result<(), PersistError> {
        let creds = self.credentials.require()?;

        match Self::insert(creds, data).await {
            Ok(()) => {
                info!("Data saved to database");
                Ok(())
            }
            Err(e) => {
                error!(error = %error_chain(&e), "Database error");
                Err(PersistError::Database(e))
            }
        }
    }
}

/// Prepares the insert once and executes it with both values bound.
async fn insert_row(conn: &mut AnyConnection, data: &str) -> Result<(), sqlx::Error> {
    let sql = insert_statement(conn.backend_name());
    let statement = (&mut *conn).prepare(sql).await?;

    let done = statement
        .query()
        .bind(data)
        .bind(PLACEHOLDER_VALUE)
        .execute(&mut *conn)
        .await?;

    debug!(rows = done.rows_affected(), "Insert executed");
    Ok(())
}

/// Builds the driver URL, carrying principal and secret for network backends.
///
/// A leading `jdbc:` is accepted and stripped. SQLite URLs are used as given.
fn connection_url(creds: ResolvedCredentials<'_>) -> Result<Url, sqlx::Error> {
    let endpoint = creds.endpoint.strip_prefix("jdbc:").unwrap_or(creds.endpoint);
    let mut url = Url::parse(endpoint).map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;

    if url.scheme() != "sqlite" {
        url.set_username(creds.principal)
            .and_then(|()| url.set_password(Some(creds.secret.expose_secret())))
            .map_err(|()| {
                sqlx::Error::Configuration("database endpoint cannot carry credentials".into())
            })?;
    }

    Ok(url)
}
