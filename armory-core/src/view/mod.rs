//! The derived table view
//!
//! `SortedCatalog` + query → filtered sequence → page slice, with
//! [`ViewState`] keeping page and page size valid for the filtered count.

pub mod pipeline;
pub mod state;
pub mod table;

pub use pipeline::{filter_catalog, normalize_query, page_slice, total_pages};
pub use state::{PageSizeOptions, ViewState};
pub use table::{LoadOutcome, LoadTicket, TableView, VehicleTable, ViewStatus, GENERIC_LOAD_ERROR};
