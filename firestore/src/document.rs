//! Firestore REST document shapes and their mapping to markers.
//!
//! A marker document holds three fields:
//!
//! ```json
//! {
//!   "name": "projects/p/databases/(default)/documents/markers/abc",
//!   "fields": {
//!     "lat": { "doubleValue": 49.84 },
//!     "lng": { "doubleValue": 24.03 },
//!     "timestamp": { "timestampValue": "2025-01-01T00:00:00Z" }
//!   }
//! }
//! ```

use crate::error::FirestoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use waymark_markers::{LatLng, Marker, MarkerId, NewMarker};

/// One typed Firestore value.
///
/// Firestore tags each value with its type (`{"doubleValue": 1.5}`). Only the
/// types a marker uses are modelled; other keys are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    /// 64-bit float.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,

    /// 64-bit integer, transmitted as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<DateTime<Utc>>,
}

impl Value {
    /// A `doubleValue`.
    #[must_use]
    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    /// A `timestampValue`.
    #[must_use]
    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Self {
            timestamp_value: Some(value),
            ..Self::default()
        }
    }

    /// Numeric content, whether stored as a double or an integer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // coordinates stored as integers are small
    pub fn as_f64(&self) -> Option<f64> {
        self.double_value.or_else(|| {
            self.integer_value
                .as_deref()
                .and_then(|raw| raw.parse::<i64>().ok())
                .map(|n| n as f64)
        })
    }
}

/// A Firestore document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name; assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Field values by name.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// Body for creating a marker document.
    #[must_use]
    pub fn from_new_marker(marker: &NewMarker) -> Self {
        let fields = BTreeMap::from([
            ("lat".to_string(), Value::double(marker.position.lat)),
            ("lng".to_string(), Value::double(marker.position.lng)),
            ("timestamp".to_string(), Value::timestamp(marker.created_at)),
        ]);
        Self { name: None, fields }
    }

    /// Document id: the last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> Option<MarkerId> {
        self.name
            .as_deref()
            .and_then(|name| name.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(MarkerId::from)
    }

    /// Read the document as a marker.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError::InvalidDocument` if the name is missing, or
    /// `lat`/`lng` are missing, non-numeric, or out of range. A missing
    /// timestamp is allowed.
    pub fn into_marker(self) -> Result<Marker, FirestoreError> {
        let name = self.name.clone().unwrap_or_default();
        let invalid = |reason: String| FirestoreError::InvalidDocument {
            name: name.clone(),
            reason,
        };

        let id = self
            .id()
            .ok_or_else(|| invalid("document has no name".to_string()))?;
        let coordinate = |field: &str| {
            self.fields
                .get(field)
                .and_then(Value::as_f64)
                .ok_or_else(|| invalid(format!("missing numeric field '{field}'")))
        };
        let position = LatLng::new(coordinate("lat")?, coordinate("lng")?)
            .map_err(|e| invalid(e.to_string()))?;
        let created_at = self.fields.get("timestamp").and_then(|v| v.timestamp_value);

        Ok(Marker {
            id: Some(id),
            position,
            created_at,
        })
    }
}

/// Response of a `documents.list` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    /// Documents on this page; absent when the collection is empty.
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Token for the next page; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Error envelope returned by the REST API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
