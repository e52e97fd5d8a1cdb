//! Vehicle table controller
//!
//! Owns the sorted catalog, the view state, the loading flag and the current
//! error, and derives a [`TableView`] for the renderer.
//!
//! ## Loads and supersession
//!
//! A load is split in two so that overlapping attempts can be expressed:
//!
//! ```text
//! begin_load()  -> LoadTicket { generation, token }   (cancels the previous ticket)
//! fetcher.fetch(Some(ticket.token()))
//! finish_load(ticket, result)                          (ignored if superseded)
//! ```
//!
//! A completion is applied only if its ticket is still the newest one and its
//! token was not cancelled. [`VehicleTable::load`] runs all three steps.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::pipeline::{filter_catalog, page_slice};
use super::state::{PageSizeOptions, ViewState};
use crate::catalog::{CatalogFetcher, FetchError, SortedCatalog, Vehicle};
use crate::config::TableConfig;

/// Shown when a failure carries no message of its own
pub const GENERIC_LOAD_ERROR: &str = "Failed to load the vehicle list";

/// Handle for one load attempt
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    token: CancellationToken,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// What `finish_load` did with a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// New catalog installed
    Applied,
    /// Error message set
    Failed,
    /// Completion belonged to a cancelled or older attempt; nothing changed
    Superseded,
}

/// Which block the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Error,
    Loading,
    Empty,
    Rows,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<Vehicle>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub query: String,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub page_size_options: PageSizeOptions,
    pub has_prev: bool,
    pub has_next: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl TableView {
    /// Error beats loading, loading beats the empty message
    pub fn status(&self) -> ViewStatus {
        if self.error.is_some() {
            ViewStatus::Error
        } else if self.loading {
            ViewStatus::Loading
        } else if self.filtered_count == 0 {
            ViewStatus::Empty
        } else {
            ViewStatus::Rows
        }
    }
}

/// The vehicle table component
#[derive(Debug)]
pub struct VehicleTable {
    catalog: SortedCatalog,
    state: ViewState,
    loading: bool,
    error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl VehicleTable {
    pub fn new(options: PageSizeOptions, initial_page_size: Option<i64>) -> Self {
        Self {
            catalog: SortedCatalog::default(),
            state: ViewState::new(options, initial_page_size),
            loading: false,
            error: None,
            loaded_at: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(
            PageSizeOptions::new(config.page_size_options.iter().copied()),
            config.initial_page_size,
        )
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &SortedCatalog {
        &self.catalog
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a load attempt, cancelling any attempt still in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.in_flight.take() {
            debug!("Cancelling load generation {}", self.generation);
            previous.cancel();
        }

        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.loading = true;
        self.error = None;

        LoadTicket {
            generation: self.generation,
            token,
        }
    }

    /// Apply the result of a load attempt unless it has been superseded
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<SortedCatalog, FetchError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || ticket.token.is_cancelled() {
            debug!(
                "Ignoring completion of load generation {} (current {})",
                ticket.generation, self.generation
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Err(FetchError::Cancelled) => {
                debug!("Load generation {} reported cancellation", ticket.generation);
                LoadOutcome::Superseded
            }
            Err(err) => {
                warn!("Catalog load failed: {}", err);
                let message = err.to_string();
                self.error = Some(if message.trim().is_empty() {
                    GENERIC_LOAD_ERROR.to_string()
                } else {
                    message
                });
                self.loading = false;
                self.in_flight = None;
                LoadOutcome::Failed
            }
            Ok(catalog) => {
                info!("Applying catalog with {} vehicles", catalog.len());
                self.catalog = catalog;
                self.loaded_at = Some(Utc::now());
                self.error = None;
                self.loading = false;
                self.in_flight = None;
                self.reconcile();
                LoadOutcome::Applied
            }
        }
    }

    /// Run a complete load attempt against `fetcher`
    pub async fn load(&mut self, fetcher: &CatalogFetcher) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = fetcher.fetch(Some(ticket.token())).await;
        self.finish_load(ticket, result)
    }

    /// Abort the attempt in flight, if any
    pub fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            self.loading = false;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
        self.reconcile();
    }

    pub fn set_page_size(&mut self, size: usize) -> bool {
        let changed = self.state.set_page_size(size);
        self.reconcile();
        changed
    }

    pub fn set_page_size_options(&mut self, options: PageSizeOptions) {
        self.state.set_options(options);
        self.reconcile();
    }

    pub fn next_page(&mut self) {
        self.state.next_page();
    }

    pub fn prev_page(&mut self) {
        self.state.prev_page();
    }

    pub fn first_page(&mut self) {
        self.state.first_page();
    }

    pub fn last_page(&mut self) {
        self.state.last_page();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.state.go_to_page(page);
    }

    /// Vehicles matching the current query, in canonical order
    pub fn filtered(&self) -> Vec<&Vehicle> {
        filter_catalog(&self.catalog, self.state.query())
    }

    /// Derive the current frame
    pub fn view(&self) -> TableView {
        let filtered = self.filtered();
        let rows = page_slice(&filtered, self.state.page(), self.state.page_size())
            .iter()
            .map(|v| (*v).clone())
            .collect();

        TableView {
            rows,
            total_count: self.catalog.len(),
            filtered_count: filtered.len(),
            query: self.state.query().to_string(),
            page: self.state.page(),
            total_pages: self.state.total_pages(),
            page_size: self.state.page_size(),
            page_size_options: self.state.options().clone(),
            has_prev: self.state.has_prev(),
            has_next: self.state.has_next(),
            loading: self.loading,
            error: self.error.clone(),
            loaded_at: self.loaded_at,
        }
    }

    fn reconcile(&mut self) {
        let count = self.filtered().len();
        self.state.reconcile(count);
    }
}
