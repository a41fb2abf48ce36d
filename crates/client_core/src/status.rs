//! Decoding of the backend's status values.
//!
//! The backend is not consistent about how a status travels: agent records
//! carry a single-key variant object (`{"approved": null}`), applications a
//! bare string, and some responses a tagged union (`{"__kind__": "approved"}`).
//! Everything is folded into [`Status`] here and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

const KIND_TAG: &str = "__kind__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
    /// The raw value had no recognizable shape or named no known status.
    Unknown,
}

impl Status {
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Status shown on a badge. `Unknown` is shown as pending.
    pub fn display_status(self) -> Self {
        match self {
            Self::Unknown => Self::Pending,
            known => known,
        }
    }

    pub fn badge_label(self) -> &'static str {
        match self.display_status() {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            _ => "Pending",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_name(&s.trim().to_ascii_lowercase()) {
            Self::Unknown => Err(format!("unknown status: {s}")),
            status => Ok(status),
        }
    }
}

/// Decodes any backend status shape. Never fails.
pub fn decode(raw: &Value) -> Status {
    match raw {
        Value::Object(map) => decode_object(map),
        Value::String(name) => Status::from_name(name),
        _ => Status::Unknown,
    }
}

fn decode_object(map: &Map<String, Value>) -> Status {
    if let Some(tag) = map.get(KIND_TAG) {
        return tag.as_str().map_or(Status::Unknown, Status::from_name);
    }
    let mut keys = map.keys();
    match (keys.next(), keys.next()) {
        (Some(only), None) => Status::from_name(only),
        _ => Status::Unknown,
    }
}

/// Decodes for badge display: unrecognized values are logged and shown as
/// pending so a malformed record stays visible in the list.
pub fn decode_for_display(raw: &Value) -> Status {
    let status = decode(raw);
    if !status.is_known() {
        warn!(raw = %raw, "unrecognized status value, displaying as pending");
    }
    status.display_status()
}

/// Variant-object encoding used when updating an agent's status.
pub fn encode_variant(status: Status) -> Value {
    let mut map = Map::new();
    map.insert(status.as_str().to_string(), Value::Null);
    Value::Object(map)
}

/// Plain-string encoding used when updating an application's status.
pub fn encode_plain(status: Status) -> Value {
    Value::String(status.as_str().to_string())
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
