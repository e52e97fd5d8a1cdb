//! The catalog in canonical order
//!
//! Built once per successful load and never mutated afterwards. Normalized
//! search keys are computed alongside so filtering does not renormalize
//! every name on each keystroke.

use super::ordering::sort_vehicles;
use super::Vehicle;
use crate::text::normalize;

/// Normalized names used by the search filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub name: String,
    pub short_name: String,
}

impl SearchKey {
    fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            name: normalize(&vehicle.name),
            short_name: normalize(&vehicle.short_name),
        }
    }

    /// Substring match against an already-normalized query
    pub fn matches(&self, normalized_query: &str) -> bool {
        normalized_query.is_empty()
            || self.name.contains(normalized_query)
            || self.short_name.contains(normalized_query)
    }
}

/// Vehicles sorted by tier, then collated name
#[derive(Debug, Clone, Default)]
pub struct SortedCatalog {
    vehicles: Vec<Vehicle>,
    keys: Vec<SearchKey>,
}

impl SortedCatalog {
    /// Sort the given vehicles into canonical order
    pub fn new(mut vehicles: Vec<Vehicle>) -> Self {
        sort_vehicles(&mut vehicles);
        let keys = vehicles.iter().map(SearchKey::for_vehicle).collect();
        Self { vehicles, keys }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicles paired with their search keys, in canonical order
    pub fn entries(&self) -> impl Iterator<Item = (&Vehicle, &SearchKey)> {
        self.vehicles.iter().zip(self.keys.iter())
    }
}
