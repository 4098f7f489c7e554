//! Per-variant projection of classified payloads into view rows.

pub mod applications;
pub mod bottlenecks;
pub mod environment;
pub mod executors;
pub mod jobs;
pub mod performance;
pub mod plans;
pub mod resources;
pub mod sql;

use super::ViewBody;
use crate::classify::{Classified, ShapeTag};
use crate::dispatch::SelectionContext;
use crate::payload::{FieldSpec, NormalizedRecord};
use serde_json::Value;

/// Everything a projector gets to work with.
pub struct Projection<'a> {
    pub classified: Classified<'a>,
    pub fields: &'static [FieldSpec],
    pub context: &'a SelectionContext,
}

impl<'a> Projection<'a> {
    /// Object records of the primary collection. A single record is a
    /// collection of one only when it carries `defining` (any path resolves).
    pub fn records(&self, defining: &[&str]) -> Vec<&'a Value> {
        let payload: &'a Value = self.classified.payload;
        match payload {
            Value::Array(items) => items.iter().filter(|v| v.is_object()).collect(),
            Value::Object(_) if crate::payload::find(payload, defining).is_some() => {
                vec![payload]
            }
            _ => Vec::new(),
        }
    }

    /// Normalize every record of the collection with this handler's fields.
    pub fn normalized(&self, defining: &[&str]) -> Vec<NormalizedRecord> {
        self.records(defining)
            .into_iter()
            .map(|record| NormalizedRecord::from_value(record, self.fields))
            .collect()
    }

    pub fn shape(&self) -> ShapeTag {
        self.classified.shape
    }
}

/// A projector returns `None` when its data guard fails, which the
/// dispatcher turns into the variant's empty state.
pub type Projector = fn(&Projection<'_>) -> Option<ViewBody>;

/// The raw-fallback projection: the payload verbatim.
pub fn raw(projection: &Projection<'_>) -> Option<ViewBody> {
    Some(ViewBody::Raw(projection.classified.root.clone()))
}
