//! Test helper functions for integration tests
//!
//! Shared across test files using the tests/common/ pattern.

#![allow(dead_code)]

use armory_core::catalog::{
    CatalogFetcher, CatalogRequest, CatalogTransport, FetchError, TransportResponse,
};
use armory_core::config::CatalogConfig;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::sync::Notify;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Get the fixtures base path
pub fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a fixture file to a string
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_path().join(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// One scripted reply
struct Step {
    response: TransportResponse,
    gate: Option<Arc<Notify>>,
}

/// Transport that replays scripted responses in call order
///
/// A step can be gated: its reply is held back until the gate is opened,
/// which lets tests decide when a slow response "arrives".
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(status, body.into(), None);
        self
    }

    /// Queue a reply held until the returned gate is notified
    pub fn respond_gated(&self, status: u16, body: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(status, body.into(), Some(gate.clone()));
        gate
    }

    fn push(&self, status: u16, body: String, gate: Option<Arc<Notify>>) {
        self.steps.lock().unwrap().push_back(Step {
            response: TransportResponse { status, body },
            gate,
        });
    }

    /// Number of requests issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Build a fetcher over this transport (shares the script)
    pub fn fetcher(&self) -> CatalogFetcher {
        CatalogFetcher::with_transport(
            Box::new(self.clone()),
            CatalogRequest::from_config(&CatalogConfig::default()),
        )
    }
}

#[async_trait]
impl CatalogTransport for ScriptedTransport {
    async fn get(&self, _request: &CatalogRequest) -> Result<TransportResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();

        let Some(step) = step else {
            return Ok(TransportResponse {
                status: 599,
                body: String::new(),
            });
        };

        if let Some(gate) = step.gate {
            gate.notified().await;
        }

        Ok(step.response)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Yield until the transport has seen `count` calls
pub async fn wait_for_calls(transport: &ScriptedTransport, count: usize) {
    while transport.calls() < count {
        tokio::task::yield_now().await;
    }
}
