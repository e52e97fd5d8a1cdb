//! Vehicle records and the raw catalog payload
//!
//! The encyclopedia endpoint answers with a status tag and a map of
//! vehicles keyed by their id (as a string).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Generic message when the API flags an error without explaining it
pub const GENERIC_API_ERROR: &str = "API returned an error";

/// One catalog vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle id
    #[serde(rename = "tank_id")]
    pub id: u64,

    /// Display name
    pub name: String,

    /// Short display name
    pub short_name: String,

    /// Tier (1..=11)
    pub tier: u8,

    /// Vehicle class, e.g. "heavyTank"
    #[serde(rename = "type")]
    pub category: String,

    /// Nation, e.g. "germany"
    #[serde(rename = "nation")]
    pub origin: String,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default)]
    pub is_gift: bool,

    pub images: VehicleImages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleImages {
    pub small_icon: String,
}

impl Vehicle {
    /// Whether the vehicle was acquired outside normal research
    pub fn is_special(&self) -> bool {
        self.is_premium || self.is_gift
    }

    /// Icon URL upgraded to https
    pub fn secure_icon_url(&self) -> String {
        match self.images.small_icon.strip_prefix("http://") {
            Some(rest) => format!("https://{rest}"),
            None => self.images.small_icon.clone(),
        }
    }
}

/// Payload status tag
///
/// Anything other than `ok`, including a missing tag, is handled as the
/// error branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Ok,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Error descriptor sent along with `status: "error"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Raw catalog response as sent by the API
///
/// Only the envelope is decoded eagerly. Records stay as raw JSON until
/// [`RawCatalogResponse::into_vehicles`] is called on an `ok` payload, so a
/// broken record in an error payload cannot hide the API's message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCatalogResponse {
    #[serde(default)]
    pub status: ApiStatus,

    /// Records keyed by id; unknown ids come back as `null`
    #[serde(default)]
    pub data: Option<BTreeMap<String, Value>>,

    #[serde(default)]
    pub error: Option<Value>,
}

impl RawCatalogResponse {
    /// Parse a payload from JSON text
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn is_ok(&self) -> bool {
        self.status == ApiStatus::Ok
    }

    /// Error descriptor, if the payload carries a well-formed one
    pub fn error_body(&self) -> Option<ApiErrorBody> {
        self.error
            .as_ref()
            .and_then(|e| serde_json::from_value(e.clone()).ok())
    }

    /// User-visible message for the error branch
    pub fn error_message(&self) -> String {
        self.error_body()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
    }

    /// Decode the records, skipping null entries
    ///
    /// Records come out in ascending numeric id order, so equal names keep a
    /// stable relative order across identical payloads.
    pub fn into_vehicles(self) -> serde_json::Result<Vec<Vehicle>> {
        let mut entries: Vec<(String, Value)> =
            self.data.unwrap_or_default().into_iter().collect();
        entries.sort_by_cached_key(|(key, _)| (key.parse::<u64>().ok(), key.clone()));

        entries
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(_, value)| serde_json::from_value(value))
            .collect()
    }
}
