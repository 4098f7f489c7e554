mod extract;
mod reader;
mod record;

pub use extract::{
    as_bool, as_f64, as_i64, as_text, extract, extract_bool, extract_f64, extract_i64,
    extract_str, find, find_in, resolve,
};
pub use reader::PayloadReader;
pub use record::{FieldKind, FieldSpec, FieldValue, NormalizedRecord};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of one tool invocation, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub payload: Option<Value>,
}

impl ToolResult {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }
}
