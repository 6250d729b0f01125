//! Synthesis of the processing nodes inserted by a rewrite.
//!
//! Each synthesized node is a code node whose embedded snippet implements
//! one fixed behavioral contract. Ids are derived deterministically from the
//! node name so repeated rewrites reuse rather than duplicate nodes, and
//! positions are offset from an anchor node purely for layout.

use serde_json::json;

use crate::error::GraphError;
use crate::workflow::{CODE_KIND, Node, Position, WorkflowDocument};

/// Behavioral contract of a synthesized node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// Pass-through that holds every item it receives inside the loop
    /// body's memory. Its output branch must stay unconnected; the
    /// accumulated contents are read out-of-band by name.
    Accumulator,
    /// Done-branch node that retrieves the full accumulated contents of a
    /// named accumulator and forwards them downstream.
    Combiner { reads_from: String },
    /// Done-branch node that retrieves the full output of a named upstream
    /// node and forwards it as the signal that storage may proceed.
    Releaser { reads_from: String },
    /// Forwards a completion signal unchanged (feedback hop).
    Relay,
}

impl NodeRole {
    /// Position offset from the anchor, fixed per role.
    fn offset(&self) -> (f64, f64) {
        match self {
            NodeRole::Accumulator => (240.0, 0.0),
            NodeRole::Combiner { .. } => (480.0, -160.0),
            NodeRole::Releaser { .. } => (1440.0, -160.0),
            NodeRole::Relay => (960.0, 80.0),
        }
    }

    /// Name of the node this role reads out-of-band, if any.
    pub fn reads_from(&self) -> Option<&str> {
        match self {
            NodeRole::Combiner { reads_from } | NodeRole::Releaser { reads_from } => {
                Some(reads_from)
            }
            _ => None,
        }
    }
}

/// What a combiner or releaser does when the retrieved set is empty.
///
/// The two historical repair versions disagree on whether an empty set
/// should also suppress the downstream continuation, so this is policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyBatchPolicy {
    /// Emit nothing: the branch halts and nothing downstream fires.
    #[default]
    HaltBranch,
    /// Emit a single empty marker item so downstream completion still fires.
    EmitEmpty,
}

/// An out-of-band read declaration: `consumer` retrieves the accumulated
/// output of `producer` by node name rather than through a graph edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub producer: String,
    pub consumer: String,
}

/// A synthesized node together with the memory-slot read it performs.
#[derive(Debug, Clone)]
pub struct Synthesized {
    pub node: Node,
    pub binding: Option<SlotBinding>,
}

/// Constructs new processing nodes placed relative to an anchor node.
pub struct NodeSynthesizer {
    anchor: Position,
    on_empty: EmptyBatchPolicy,
}

impl NodeSynthesizer {
    /// Anchors the synthesizer at a named node. Fails with `NodeNotFound`
    /// if the anchor is absent from the graph.
    pub fn anchored_at(
        doc: &WorkflowDocument,
        anchor: &str,
        on_empty: EmptyBatchPolicy,
    ) -> Result<Self, GraphError> {
        let node = doc.find_node_by_name(anchor)?;
        Ok(Self {
            anchor: node.position,
            on_empty,
        })
    }

    /// Produces a code node implementing `role`, named `name`.
    pub fn synthesize(&self, role: &NodeRole, name: &str) -> Synthesized {
        let (dx, dy) = role.offset();
        let node = Node::new(
            node_id(name),
            name,
            CODE_KIND,
            2.0,
            self.anchor.offset(dx, dy),
            json!({ "jsCode": self.snippet(role) }),
        );
        let binding = role.reads_from().map(|producer| SlotBinding {
            producer: producer.to_string(),
            consumer: name.to_string(),
        });
        Synthesized { node, binding }
    }

    fn snippet(&self, role: &NodeRole) -> String {
        match role {
            NodeRole::Accumulator => "\
// Hold every item from this iteration. The surrounding batch loop
// accumulates items across iterations; nothing is emitted downstream.
return $input.all();"
                .to_string(),
            NodeRole::Combiner { reads_from } => format!(
                "\
// Fires once, on the done branch, after the last document batch.
const collected = $('{reads_from}').all();
if (collected.length === 0) {{
  {}
}}
return collected;",
                self.on_empty_stmt()
            ),
            NodeRole::Releaser { reads_from } => format!(
                "\
// Fires once, on the done branch, after the last chunk batch.
// Every batch is vectorized, so documents may now be stored.
const documents = $('{reads_from}').all();
if (documents.length === 0) {{
  {}
}}
return documents;",
                self.on_empty_stmt()
            ),
            NodeRole::Relay => "\
// Forward the completion signal unchanged.
return $input.all();"
                .to_string(),
        }
    }

    fn on_empty_stmt(&self) -> &'static str {
        match self.on_empty {
            EmptyBatchPolicy::HaltBranch => "return [];",
            EmptyBatchPolicy::EmitEmpty => "return [{ json: { itemCount: 0 } }];",
        }
    }
}

/// Deterministic id for a synthesized node, derived from its name.
fn node_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 5);
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    id.push_str("-node");
    id
}
