// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for safe-intake-core integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use safe_intake_core::{Credentials, Notification, Notifier};
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection};
use tempfile::TempDir;
use tracing::instrument::WithSubscriber;
use tracing_subscriber::fmt::MakeWriter;

/// A throwaway SQLite database holding the `mytable` table.
pub struct TestDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    /// Creates the database file and the two-column table.
    pub async fn with_table() -> Self {
        let db = Self::without_table();
        let mut conn = db.connect().await;
        sqlx::query("CREATE TABLE mytable (column1 TEXT, column2 TEXT)")
            .execute(&mut conn)
            .await
            .expect("create table");
        conn.close().await.expect("close");
        db
    }

    /// Reserves a path without creating anything.
    pub fn without_table() -> Self {
        install_default_drivers();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("intake.db");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }

    /// Credentials pointing at this database.
    pub fn credentials(&self) -> Credentials {
        let url = self.url();
        Credentials::from_lookup(move |key| match key {
            "DB_URL" => Some(url.clone()),
            "DB_USER" => Some("intake".to_string()),
            "DB_PASSWORD" => Some("not-used-by-sqlite".to_string()),
            _ => None,
        })
    }

    pub async fn connect(&self) -> AnyConnection {
        AnyConnection::connect(&self.url()).await.expect("connect")
    }

    pub async fn rows(&self) -> Vec<(String, String)> {
        let mut conn = self.connect().await;
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT column1, column2 FROM mytable ORDER BY rowid",
        )
        .fetch_all(&mut conn)
        .await
        .expect("select rows");
        conn.close().await.expect("close");
        rows
    }
}

/// Credentials with the password variable missing.
pub fn credentials_without_secret(url: &str) -> Credentials {
    let url = url.to_string();
    Credentials::from_lookup(move |key| match key {
        "DB_URL" => Some(url.clone()),
        "DB_USER" => Some("intake".to_string()),
        _ => None,
    })
}

/// Notifier that remembers what it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.lock().unwrap().push(notification.clone());
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Awaits `future` and returns its output with what it logged at INFO and above.
pub async fn capture_logs<F: Future>(future: F) -> (F::Output, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    let output = future.with_subscriber(subscriber).await;
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (output, logs)
}
