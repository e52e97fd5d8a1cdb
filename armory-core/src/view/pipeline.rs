//! Filter and page derivation
//!
//! Pure functions over the sorted catalog. They are cheap enough to call on
//! every state change and return the same output for the same input.

use crate::catalog::{SortedCatalog, Vehicle};
use crate::text::normalize;

/// Normalize a raw search query; whitespace-only queries become empty
pub fn normalize_query(query: &str) -> String {
    normalize(query).trim().to_string()
}

/// Vehicles whose name or short name contains the query, in catalog order
pub fn filter_catalog<'a>(catalog: &'a SortedCatalog, query: &str) -> Vec<&'a Vehicle> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return catalog.vehicles().iter().collect();
    }

    catalog
        .entries()
        .filter(|(_, key)| key.matches(&needle))
        .map(|(vehicle, _)| vehicle)
        .collect()
}

/// Number of pages for `count` items, never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Items on a 1-based page, clipped to what exists
///
/// Out-of-range pages give an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    else {
        return &[];
    };

    if start >= items.len() {
        return &[];
    }

    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
