//! Catalog fetcher
//!
//! Retrieves the raw payload through a [`CatalogTransport`], validates it and
//! hands back a [`SortedCatalog`]. The transport is a trait so tests can
//! script responses without a network.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{FetchError, RawCatalogResponse, SortedCatalog};
use crate::config::CatalogConfig;

/// A GET request against the catalog endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub endpoint: String,
    pub query: Vec<(String, String)>,
}

impl CatalogRequest {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            query: config.query_params(),
        }
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for the network side of the fetcher
///
/// Implementations perform a single request and report whatever status came
/// back; interpreting it is the fetcher's job.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, request: &CatalogRequest) -> Result<TransportResponse, FetchError>;

    /// Transport identifier for logging
    fn name(&self) -> &'static str;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout_seconds: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("armory/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, request: &CatalogRequest) -> Result<TransportResponse, FetchError> {
        let response = self
            .client
            .get(&request.endpoint)
            .query(&request.query)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(FetchError::Transport)?;

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Fetches, validates and orders the vehicle catalog
pub struct CatalogFetcher {
    transport: Box<dyn CatalogTransport>,
    request: CatalogRequest,
}

impl CatalogFetcher {
    /// Create a fetcher talking HTTP to the configured endpoint
    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.effective_timeout_seconds())?;
        Ok(Self::with_transport(
            Box::new(transport),
            CatalogRequest::from_config(config),
        ))
    }

    /// Create a fetcher over any transport
    pub fn with_transport(transport: Box<dyn CatalogTransport>, request: CatalogRequest) -> Self {
        Self { transport, request }
    }

    pub fn request(&self) -> &CatalogRequest {
        &self.request
    }

    /// Fetch the catalog
    ///
    /// Cancelling `cancel` before completion aborts the in-flight request and
    /// yields [`FetchError::Cancelled`], whatever the request would have
    /// returned.
    pub async fn fetch(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<SortedCatalog, FetchError> {
        debug!(
            "Fetching catalog from {} via {}",
            self.request.endpoint,
            self.transport.name()
        );
        let started = Instant::now();

        let response = match cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(FetchError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("Catalog fetch cancelled before completion");
                        return Err(FetchError::Cancelled);
                    }
                    result = self.transport.get(&self.request) => result?,
                }
            }
            None => self.transport.get(&self.request).await?,
        };

        if !response.is_success() {
            warn!("Catalog API responded with HTTP {}", response.status);
            return Err(FetchError::Network {
                status: response.status,
            });
        }

        let payload = RawCatalogResponse::from_json(&response.body)?;

        if !payload.is_ok() {
            let message = payload.error_message();
            warn!("Catalog API reported an error: {}", message);
            return Err(FetchError::Api { message });
        }

        let catalog = SortedCatalog::new(payload.into_vehicles()?);

        info!(
            vehicles = catalog.len(),
            elapsed = ?started.elapsed(),
            "Catalog loaded"
        );

        Ok(catalog)
    }
}
