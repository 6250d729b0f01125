use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::connection::ConnectionMap;
use super::node::Node;
use crate::error::DocumentError;

/// A workflow document as persisted by the automation platform.
///
/// Only `name`, `nodes` and `connections` are modeled; every other
/// top-level field is carried through `extra` untouched, so loading and
/// saving a document without edits preserves its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: ConnectionMap,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WorkflowDocument {
    /// Parses a workflow document from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a workflow document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| DocumentError::Read {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to a JSON file. Nothing is written if
    /// serialization fails.
    pub fn save(&self, path: &str) -> Result<(), DocumentError> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|e| DocumentError::Write {
            path: path.to_string(),
            source: e,
        })
    }
}
