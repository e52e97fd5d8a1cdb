//! Armory Catalog - vehicle retrieval and canonical ordering
//!
//! # Architecture
//!
//! ```text
//! Encyclopedia API
//!     │  {status, data: {id: vehicle}, error?}
//!     ▼
//! CatalogTransport (reqwest)
//!     │  status + body
//!     ▼
//! CatalogFetcher  ── NetworkError / ApiError / Cancelled
//!     │  vehicles (unordered)
//!     ▼
//! SortedCatalog   ← tier, then ru-collated name
//! ```

mod error;
mod fetcher;
mod ordering;
mod sorted;
mod vehicle;

pub use error::FetchError;
pub use fetcher::{CatalogFetcher, CatalogRequest, CatalogTransport, HttpTransport, TransportResponse};
pub use ordering::{collation_key, compare_names, compare_vehicles, sort_vehicles};
pub use sorted::{SearchKey, SortedCatalog};
pub use vehicle::{
    ApiErrorBody, ApiStatus, RawCatalogResponse, Vehicle, VehicleImages, GENERIC_API_ERROR,
};
