//! View state and its pagination rules
//!
//! `ViewState` owns the query, the 1-based page and the page size. After every
//! transition that can change the filtered count, the owner calls
//! [`ViewState::reconcile`] so that
//! `1 <= page <= max(1, ceil(filtered_count / page_size))` always holds.

use serde::Serialize;
use tracing::{debug, warn};

use super::pipeline::total_pages;
use crate::config::DEFAULT_PAGE_SIZE_OPTIONS;

/// Sanitized set of page sizes: positive, deduplicated, ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSizeOptions(Vec<usize>);

impl PageSizeOptions {
    /// Build from raw configured values
    ///
    /// Non-positive values are dropped. If nothing is left, the built-in
    /// defaults are used instead.
    pub fn new<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut sizes: Vec<usize> = raw
            .into_iter()
            .filter(|&n| n > 0)
            .filter_map(|n| usize::try_from(n).ok())
            .collect();
        sizes.sort_unstable();
        sizes.dedup();

        if sizes.is_empty() {
            warn!(
                "No positive page sizes configured; using defaults {:?}",
                DEFAULT_PAGE_SIZE_OPTIONS
            );
            return Self::default();
        }

        Self(sizes)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, size: usize) -> bool {
        self.0.contains(&size)
    }

    /// Smallest configured size
    pub fn first(&self) -> usize {
        // Never empty: `new` falls back to the defaults
        self.0.first().copied().unwrap_or(DEFAULT_PAGE_SIZE_OPTIONS[0])
    }

    /// Page size to start with: `initial` if it is an option, else the smallest
    pub fn resolve_initial(&self, initial: Option<i64>) -> usize {
        initial
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| self.contains(n))
            .unwrap_or_else(|| self.first())
    }
}

impl Default for PageSizeOptions {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE_OPTIONS.to_vec())
    }
}

/// Query, page and page size driving the view pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    query: String,
    page: usize,
    page_size: usize,
    options: PageSizeOptions,
    filtered_count: usize,
}

impl ViewState {
    pub fn new(options: PageSizeOptions, initial_page_size: Option<i64>) -> Self {
        let page_size = options.resolve_initial(initial_page_size);
        Self {
            query: String::new(),
            page: 1,
            page_size,
            options,
            filtered_count: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn options(&self) -> &PageSizeOptions {
        &self.options
    }

    /// Filtered count seen by the last `reconcile`
    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Replace the query and return to the first page
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Switch page size; ignored unless `size` is a configured option
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !self.options.contains(size) {
            debug!("Ignoring page size {} (options: {:?})", size, self.options);
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.total_pages());
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn last_page(&mut self) {
        self.page = self.total_pages();
    }

    /// Jump to a page, clamped into range
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// Record the current filtered count and clamp the page into range
    pub fn reconcile(&mut self, filtered_count: usize) {
        self.filtered_count = filtered_count;
        let total = self.total_pages();
        if self.page > total {
            debug!("Clamping page {} to {}", self.page, total);
            self.page = total;
        }
        if self.page == 0 {
            self.page = 1;
        }
    }

    /// Swap the option set; resets to the smallest size if the active one vanished
    pub fn set_options(&mut self, options: PageSizeOptions) {
        self.options = options;
        if !self.options.contains(self.page_size) {
            debug!(
                "Page size {} no longer offered; resetting to {}",
                self.page_size,
                self.options.first()
            );
            self.page_size = self.options.first();
            self.page = 1;
        }
    }
}
