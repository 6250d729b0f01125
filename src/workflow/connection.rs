use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Port kind carrying ordinary data flow.
pub const MAIN_PORT: &str = "main";

/// Branch index of a batch iterator's loop body, fired once per batch.
pub const LOOP_BRANCH: usize = 0;

/// Branch index of a batch iterator's done output, fired exactly once
/// after the last batch.
pub const DONE_BRANCH: usize = 1;

/// A directed edge from a source node's output branch to a target node's
/// input slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Name of the target node.
    pub node: String,
    /// Port kind on the target, `"main"` for data flow.
    #[serde(rename = "type")]
    pub kind: String,
    /// Input slot index on the target, 0 for single-input nodes.
    pub index: u32,
}

impl Connection {
    /// A main-port connection into the target's input slot 0.
    pub fn main(target: impl Into<String>) -> Self {
        Self {
            node: target.into(),
            kind: MAIN_PORT.to_string(),
            index: 0,
        }
    }
}

/// One output branch: the ordered list of connections leaving it.
pub type Branch = Vec<Connection>;

/// All outgoing ports of one source node, keyed by port kind. Only the
/// `main` port is modeled; other port kinds are preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePorts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub main: Vec<Branch>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// The connection map of a workflow: source node name to that node's
/// outgoing ports. Branch index `b` holds the connections leaving output
/// `b`; ordinary nodes have one branch, batch iterators exactly two
/// (0 = loop body, 1 = done).
///
/// Backed by an ordered map so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionMap(BTreeMap<String, NodePorts>);

impl ConnectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&NodePorts> {
        self.0.get(source)
    }

    /// The main-port branch list of `source`, if any wiring exists for it.
    pub fn branches(&self, source: &str) -> Option<&[Branch]> {
        self.0.get(source).map(|p| p.main.as_slice())
    }

    /// One main-port branch of `source`.
    pub fn branch(&self, source: &str, index: usize) -> Option<&Branch> {
        self.0.get(source).and_then(|p| p.main.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodePorts)> {
        self.0.iter()
    }

    /// Full-replace semantics: overwrites the entire target list of one
    /// branch, growing the branch vector with empty branches as needed.
    /// Re-stating complete wiring rather than patching it keeps repeated
    /// rewrites from accumulating stale edges.
    pub fn set_branch(&mut self, source: &str, branch: usize, targets: Vec<Connection>) {
        let ports = self.0.entry(source.to_string()).or_default();
        if ports.main.len() <= branch {
            ports.main.resize(branch + 1, Vec::new());
        }
        ports.main[branch] = targets;
    }

    /// Strips every connection pointing at `target` from every source's
    /// every branch. The order of surviving connections is preserved.
    pub fn remove_target(&mut self, target: &str) {
        for ports in self.0.values_mut() {
            for branch in &mut ports.main {
                branch.retain(|c| c.node != target);
            }
        }
    }

    /// Names of the sources that currently feed `target`, in map order.
    pub fn sources_into(&self, target: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, ports)| {
                ports
                    .main
                    .iter()
                    .any(|branch| branch.iter().any(|c| c.node == target))
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl FromIterator<(String, NodePorts)> for ConnectionMap {
    fn from_iter<T: IntoIterator<Item = (String, NodePorts)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
