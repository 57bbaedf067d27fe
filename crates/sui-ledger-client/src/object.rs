//! Raw ledger object model
//!
//! Object content arrives as deeply nested, weakly typed "fields" bags
//! (struct values wrap their members under a `fields` key, dynamic fields
//! wrap their payload under `value.fields`, and numbers are decimal
//! strings). The model keeps content as [`serde_json::Value`] and leaves
//! typed extraction to [`crate::record`] and the protocol decoders.

use serde::{Deserialize, Serialize};

use clamm_core::ObjectId;

/// A fetched object: identity, type tag, and its raw fields bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    pub version: u64,
    /// Full struct tag of the object, e.g.
    /// `0x..::interest_pool::InterestPool<0x..::curves::Stable>`
    pub type_tag: String,
    /// The object's `fields` map
    pub content: serde_json::Value,
}

/// One entry of a dynamic-field listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    /// Id of the field object itself (fetch it to read the value)
    pub object_id: ObjectId,
    /// Type tag of the field's value
    pub type_tag: String,
}

/// One page of dynamic fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldPage {
    pub data: Vec<DynamicFieldInfo>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// A single raw return value from a simulated command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnValue {
    /// BCS bytes of the value
    pub bytes: Vec<u8>,
    /// Type tag of the value, e.g. `u64`
    pub type_tag: String,
}

/// Results of one simulated command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub return_values: Vec<ReturnValue>,
}

/// Results of a simulated execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevInspectResults {
    /// Per-command results, in command order
    pub results: Vec<CommandResult>,
    /// Execution error, if the simulation aborted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReturnValue {
    pub fn new(bytes: Vec<u8>, type_tag: impl Into<String>) -> Self {
        Self {
            bytes,
            type_tag: type_tag.into(),
        }
    }

    /// Convenience constructor for a `u64` scalar return value.
    pub fn u64(value: u64) -> Self {
        Self::new(value.to_le_bytes().to_vec(), "u64")
    }
}
