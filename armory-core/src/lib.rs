//! Armory core library exports
//!
//! The data pipeline behind the vehicle table: fetch the raw catalog, order it
//! once, then derive the filtered page the renderer shows.

pub mod catalog;
pub mod config;
pub mod text;
pub mod view;

pub use catalog::{CatalogFetcher, FetchError, SortedCatalog, Vehicle};
pub use config::ArmoryConfig;
pub use view::{TableView, VehicleTable, ViewState};
