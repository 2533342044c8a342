//! Test tools shared by the unit tests of this crate.


use std::io;
use std::sync::{Arc, Mutex};

use httpmock::MockServer;
use slog::{Drain, Logger};
use slog_async::Async;
use slog_term::{CompactFormat, FullFormat, PlainDecorator, PlainSyncDecorator};

use crate::AirtableClient;

pub(crate) use double::FakeRemoteTable;

pub(crate) const TEST_BASE_ID: &str = "appTestBase";
pub(crate) const TEST_API_KEY: &str = "patTestKey.0123456789";

pub(crate) struct TestLogger;

impl TestLogger {
    fn from_writer<W: io::Write + Send + 'static>(writer: W) -> Logger {
        let decorator = PlainDecorator::new(writer);
        let drain = CompactFormat::new(decorator).build().fuse();
        let drain = Async::new(drain).build().fuse();
        Logger::root(Arc::new(drain), slog::o!())
    }

    pub(crate) fn stdout() -> Logger {
        Self::from_writer(slog_term::TestStdoutWriter)
    }

    /// Logger writing synchronously in memory, with an inspector to read what was logged.
    pub(crate) fn memory() -> (Logger, MemoryLogInspector) {
        let buffer = SharedBuffer::default();
        let decorator = PlainSyncDecorator::new(buffer.clone());
        let drain = FullFormat::new(decorator).build().fuse();

        (
            Logger::root(drain, slog::o!()),
            MemoryLogInspector { buffer },
        )
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("poisoned log buffer"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) struct MemoryLogInspector {
    buffer: SharedBuffer,
}

impl MemoryLogInspector {
    pub(crate) fn contains_log(&self, expected: &str) -> bool {
        let logs = self.buffer.0.lock().unwrap();
        String::from_utf8_lossy(&logs).contains(expected)
    }
}

pub(crate) fn setup_server_and_client() -> (MockServer, AirtableClient) {
    let server = MockServer::start();
    let client = AirtableClient::builder(server.base_url(), TEST_BASE_ID)
        .with_api_key(TEST_API_KEY)
        .with_logger(TestLogger::stdout())
        .build()
        .unwrap();

    (server, client)
}

/// Route of a table under the test base, as seen by the mock server.
pub(crate) fn table_path(table_name: &str) -> String {
    format!("/v0/{TEST_BASE_ID}/{table_name}")
}

macro_rules! assert_error_matches {
    ($error:expr, $expected_pattern:pat) => {{
        let error = &$error;
        assert!(
            matches!(error, $expected_pattern),
            "Expected error to match `{}`\ngot '{error:?}'",
            stringify!($expected_pattern),
        );
    }};
}
pub(crate) use assert_error_matches;
