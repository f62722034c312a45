//! Wire types for QuickBooks Online API responses.
//!
//! The API wraps every answer in an envelope: query results under
//! `QueryResponse` keyed by entity name, single records under the entity
//! name itself, and failures under `Fault`. Payloads are otherwise passed
//! through as raw JSON; this server never models full entity records.

use serde::Deserialize;
use serde_json::Value;

/// Top-level error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultEnvelope {
    #[serde(rename = "Fault")]
    pub fault: Fault,
}

/// The `Fault` object: a fault type plus one or more error details.
#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    #[serde(rename = "Error", default)]
    pub errors: Vec<FaultError>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One error entry inside a fault.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultError {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Detail", default)]
    pub detail: Option<String>,
    #[serde(rename = "code", default)]
    pub code: Option<String>,
}

impl Fault {
    /// Vendor error code of the first error entry, if any.
    pub fn primary_code(&self) -> Option<&str> {
        self.errors.first().and_then(|err| err.code.as_deref())
    }

    /// Human-readable summary joining message and detail of every entry.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .errors
            .iter()
            .map(|err| match (&err.message, &err.detail) {
                (Some(message), Some(detail)) => format!("{message}: {detail}"),
                (Some(message), None) => message.clone(),
                (None, Some(detail)) => detail.clone(),
                (None, None) => "unknown error".to_string(),
            })
            .collect();
        if parts.is_empty() {
            parts.push(self.kind.clone().unwrap_or_else(|| "unknown fault".to_string()));
        }
        parts.join("; ")
    }
}

/// Pull the entity rows out of a `QueryResponse` body.
///
/// A query that matches nothing omits the entity key entirely; that is an
/// empty result, not an error.
pub fn extract_rows(body: &Value, entity: &str) -> Vec<Value> {
    body["QueryResponse"][entity]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

/// Pull `totalCount` out of a COUNT query response body.
pub fn extract_total_count(body: &Value) -> Option<i64> {
    body["QueryResponse"]["totalCount"].as_i64()
}

/// Unwrap the single-record envelope of a read or write response. Falls
/// back to the whole body when the entity key is absent.
pub fn extract_record(body: &Value, entity: &str) -> Value {
    match body.get(entity) {
        Some(record) => record.clone(),
        None => body.clone(),
    }
}
