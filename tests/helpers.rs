// Shared test helpers: a listener implementation that forwards resolver
// callbacks into a channel so tests can await and inspect them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use channel_resolver::{Address, ResolverListener, ServiceConfig, Status};

/// Initializes crate logging for the test run; later calls are no-ops.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One listener callback, as observed by a test.
#[derive(Debug)]
#[allow(dead_code)] // Not every test file inspects every field
pub enum Event {
    Success {
        addresses: Vec<Address>,
        config: Option<ServiceConfig>,
        config_error: Option<Status>,
    },
    Error(Status),
}

/// Listener that forwards every callback into an unbounded channel.
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelListener {
    #[allow(dead_code)] // Used by other test files
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Event>) {
        // Every test builds its listener first, so this is the one shared
        // init point for log output.
        init_logging();
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ChannelListener { tx }), rx)
    }
}

impl ResolverListener for ChannelListener {
    fn on_successful_resolution(
        &self,
        addresses: Vec<Address>,
        config: Option<ServiceConfig>,
        config_error: Option<Status>,
    ) {
        let _ = self.tx.send(Event::Success {
            addresses,
            config,
            config_error,
        });
    }

    fn on_error(&self, status: Status) {
        let _ = self.tx.send(Event::Error(status));
    }
}

/// Waits up to `timeout` for the next resolver callback.
#[allow(dead_code)] // Used by other test files
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>, timeout: Duration) -> Event {
    tokio::time::timeout(timeout, rx.recv())
        .await
        .expect("timed out waiting for a resolver callback")
        .expect("listener channel closed")
}

/// Renders an address list to its canonical string forms.
#[allow(dead_code)] // Used by other test files
pub fn rendered(addresses: &[Address]) -> Vec<String> {
    addresses.iter().map(|a| a.to_string()).collect()
}
