use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind tag of batch iterator nodes, which expose the two-branch
/// loop/done output convention.
pub const BATCH_ITERATOR_KIND: &str = "n8n-nodes-base.splitInBatches";

/// Kind tag of code execution nodes.
pub const CODE_KIND: &str = "n8n-nodes-base.code";

/// Canvas position of a node. Serialized as an `[x, y]` pair.
///
/// Positions are a layout hint only and carry no semantic weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub f64, pub f64);

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    /// Returns a new position shifted by the given deltas.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self(self.0 + dx, self.1 + dy)
    }
}

/// A single processing node in a workflow graph.
///
/// The `name` is the addressing key used by connections and must be unique
/// within a graph. Kind-specific configuration (for code nodes, the embedded
/// snippet) lives in `parameters`; fields this crate does not model are
/// preserved verbatim in `extra` so documents round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "typeVersion", default = "default_type_version")]
    pub type_version: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "empty_parameters")]
    pub parameters: Value,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_type_version() -> f64 {
    1.0
}

fn empty_parameters() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        type_version: f64,
        position: Position,
        parameters: Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            type_version,
            position,
            parameters,
            extra: BTreeMap::new(),
        }
    }

    /// Whether this node follows the two-branch loop/done output convention.
    pub fn is_batch_iterator(&self) -> bool {
        self.kind == BATCH_ITERATOR_KIND
    }
}
