//! Graph model operations over a workflow document.
//!
//! Connections address nodes by name, so every mutating operation here
//! guards the invariant that names are unique within the graph.

use ahash::AHashSet;
use itertools::Itertools;

use super::connection::Connection;
use super::document::WorkflowDocument;
use super::node::Node;
use crate::error::GraphError;

impl WorkflowDocument {
    /// Finds a node by exact, case-sensitive name.
    pub fn find_node_by_name(&self, name: &str) -> Result<&Node, GraphError> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// The set of node names present in the graph.
    pub fn node_names(&self) -> AHashSet<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Rejects the graph if two nodes share a name. Name-keyed rewiring is
    /// unsafe on such a graph, so this runs before any rewrite.
    pub fn ensure_unique_names(&self) -> Result<(), GraphError> {
        match self
            .nodes
            .iter()
            .map(|n| n.name.as_str())
            .duplicates()
            .next()
        {
            Some(dup) => Err(GraphError::DuplicateName(dup.to_string())),
            None => Ok(()),
        }
    }

    /// Appends nodes to the graph. Fails without modifying the graph if any
    /// new name collides with an existing node or with a sibling in `nodes`.
    pub fn add_nodes(&mut self, nodes: Vec<Node>) -> Result<(), GraphError> {
        if let Some(dup) = nodes.iter().map(|n| n.name.as_str()).duplicates().next() {
            return Err(GraphError::DuplicateName(dup.to_string()));
        }
        let existing = self.node_names();
        if let Some(clash) = nodes.iter().find(|n| existing.contains(n.name.as_str())) {
            return Err(GraphError::DuplicateName(clash.name.clone()));
        }
        self.nodes.extend(nodes);
        Ok(())
    }

    /// Full-replaces one output branch of `source`. Fails if `source` does
    /// not name a node in the graph.
    pub fn set_branch_connections(
        &mut self,
        source: &str,
        branch: usize,
        targets: Vec<Connection>,
    ) -> Result<(), GraphError> {
        self.find_node_by_name(source)?;
        self.connections.set_branch(source, branch, targets);
        Ok(())
    }

    /// Strips every connection pointing at `target` across all sources and
    /// branches, preserving the order of the survivors.
    pub fn remove_target_from_all_branches(&mut self, target: &str) {
        self.connections.remove_target(target);
    }
}
