// SPDX-License-Identifier: Apache-2.0

//! Log capture shared by unit tests.

use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};

use tracing::instrument::WithSubscriber;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` and returns what it logged at INFO and above.
pub(crate) fn capture<F: FnOnce()>(f: F) -> String {
    let captured = Captured::default();
    tracing::subscriber::with_default(captured.subscriber(), f);
    captured.contents()
}

/// Awaits `future` and returns its output with what it logged at INFO and above.
pub(crate) async fn capture_async<F: Future>(future: F) -> (F::Output, String) {
    let captured = Captured::default();
    let output = future.with_subscriber(captured.subscriber()).await;
    (output, captured.contents())
}
