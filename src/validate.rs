//! Post-rewrite topology validation.
//!
//! Validation runs on the repaired document, before it is saved. A failure
//! here is fatal and must prevent the save. The feedback cycle is only
//! checked for presence; whether the loop terminates is a property of the
//! iterator's own exhaustion semantics at runtime, not of the wiring.

use ahash::AHashSet;

use crate::error::ValidationError;
use crate::rewrite::RewriteReport;
use crate::workflow::{DONE_BRANCH, WorkflowDocument};

/// Checks the invariants a repaired workflow graph must satisfy.
pub struct TopologyValidator<'a> {
    doc: &'a WorkflowDocument,
    names: AHashSet<&'a str>,
}

impl<'a> TopologyValidator<'a> {
    pub fn new(doc: &'a WorkflowDocument) -> Self {
        let names = doc.node_names();
        Self { doc, names }
    }

    /// Runs every check: structural invariants plus the ones tied to the
    /// given rewrite.
    pub fn check_all(&self, report: &RewriteReport) -> Result<(), ValidationError> {
        self.check_structure()?;
        self.check_rewrite(report)
    }

    /// Structural invariants that hold for any repaired graph: no dangling
    /// references, and the two-branch shape of every batch iterator.
    pub fn check_structure(&self) -> Result<(), ValidationError> {
        for (source, ports) in self.doc.connections.iter() {
            if !self.names.contains(source.as_str()) {
                return Err(ValidationError::DanglingConnection {
                    name: source.clone(),
                    context: source.clone(),
                });
            }
            for branch in &ports.main {
                for conn in branch {
                    if !self.names.contains(conn.node.as_str()) {
                        return Err(ValidationError::DanglingConnection {
                            name: conn.node.clone(),
                            context: source.clone(),
                        });
                    }
                }
            }
        }

        for node in self.doc.nodes.iter().filter(|n| n.is_batch_iterator()) {
            let branches = self.doc.connections.branches(&node.name).unwrap_or(&[]);
            if branches.len() != 2 {
                return Err(ValidationError::BranchArityViolation {
                    node: node.name.clone(),
                    found: branches.len(),
                });
            }
            let done = &branches[DONE_BRANCH];
            if done.len() != 1 {
                return Err(ValidationError::DoneBranchFanout {
                    node: node.name.clone(),
                    found: done.len(),
                });
            }
        }
        Ok(())
    }

    /// Invariants tied to the roles a rewrite introduced: accumulator
    /// isolation, out-of-band reads bound to existing producers, each
    /// reader driven by exactly one done branch, and the encoded feedback
    /// cycle being present.
    pub fn check_rewrite(&self, report: &RewriteReport) -> Result<(), ValidationError> {
        for accumulator in &report.accumulators {
            if let Some(branches) = self.doc.connections.branches(accumulator) {
                if branches.iter().any(|b| !b.is_empty()) {
                    return Err(ValidationError::AccumulatorNotIsolated(accumulator.clone()));
                }
            }
        }

        for slot in &report.slots {
            if !self.names.contains(slot.producer.as_str()) {
                return Err(ValidationError::UnboundSlot {
                    producer: slot.producer.clone(),
                    consumer: slot.consumer.clone(),
                });
            }
            let triggers = self
                .doc
                .nodes
                .iter()
                .filter(|n| n.is_batch_iterator())
                .filter_map(|n| self.doc.connections.branch(&n.name, DONE_BRANCH))
                .flatten()
                .filter(|c| c.node == slot.consumer)
                .count();
            if triggers != 1 {
                return Err(ValidationError::DoneTriggerViolation {
                    consumer: slot.consumer.clone(),
                    found: triggers,
                });
            }
        }

        if let Some((from, to)) = &report.feedback {
            self.check_feedback(from, to)?;
        }
        Ok(())
    }

    /// Confirms the feedback cycle is encoded: following forward
    /// connections from `from` reaches `to`. The walk is bounded by the
    /// visited set, so encoded cycles cannot loop it.
    fn check_feedback(&self, from: &str, to: &str) -> Result<(), ValidationError> {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for branch in self.doc.connections.branches(current).unwrap_or(&[]) {
                for conn in branch {
                    if conn.node == to {
                        return Ok(());
                    }
                    stack.push(conn.node.as_str());
                }
            }
        }
        Err(ValidationError::FeedbackMissing {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
