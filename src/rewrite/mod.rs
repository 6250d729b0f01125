//! The connection rewriter.
//!
//! The repair is not a general graph algorithm: it is an ordered table of
//! named fixes, each declaring the complete desired wiring of one branch.
//! The table is computed from the input graph (rules are only emitted for
//! sources that exist after synthesis, and desired targets are filtered to
//! present nodes), then applied in a single deterministic pass over a fresh
//! copy of the connection map. The document is only updated once every rule
//! has applied cleanly, so a failed rewrite leaves the input untouched.

mod rules;

pub use rules::RewireRule;

use ahash::AHashSet;

use crate::error::RewriteError;
use crate::synth::{EmptyBatchPolicy, NodeRole, NodeSynthesizer, SlotBinding};
use crate::workflow::{Connection, DONE_BRANCH, LOOP_BRANCH, WorkflowDocument};

/// Canonical node names addressed by the standard repair.
pub mod names {
    pub const LOOP_OVER_BATCHES: &str = "Loop Over Batches";
    pub const DOWNLOAD_CONTENT_BATCH: &str = "Download Content (Batch)";
    pub const BATCH_COMPLETION_NOTIFICATION: &str = "Batch Completion Notification";
    pub const CHUNK_CONTENT: &str = "Chunk Content";
    pub const AGGREGATE_ALL_CHUNKS: &str = "Aggregate All Chunks";
    pub const COMBINE_ALL_CHUNKS: &str = "Combine All Chunks";
    pub const BATCH_CHUNK_GROUPS: &str = "Batch Chunk Groups";
    pub const LOOP_OVER_CHUNK_BATCHES: &str = "Loop Over Chunk Batches";
    pub const EXTRACT_CHUNKS_FROM_BATCH: &str = "Extract Chunks from Batch";
    pub const WAIT_FOR_VECTORS: &str = "Wait for Vectors";
    pub const RELEASE_DOCUMENTS: &str = "Release Documents for Storage";
    pub const PREPARE_DOCUMENTS: &str = "Prepare Documents for Storage";
    pub const COLLECT_STORAGE_RESULTS: &str = "Collect Storage Results";
    pub const BATCH_COMPLETION_SIGNAL: &str = "Batch Completion Signal";
    pub const BATCH_COMPLETION_METRICS: &str = "Batch Completion Metrics";
    pub const STORE_VECTORS_MEETINGS: &str = "Store Vector Chunks - Meetings";
    pub const STORE_VECTORS_STRATEGY: &str = "Store Vector Chunks - Strategy";
}

/// Shape of the encoded feedback loop that re-enters the chunk iterator
/// after storage confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackStyle {
    /// Storage confirmation re-enters the iterator directly.
    #[default]
    Direct,
    /// Storage confirmation passes through a relay node first.
    Signal,
}

/// Policy knobs of a rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewritePolicy {
    pub feedback: FeedbackStyle,
    pub on_empty: EmptyBatchPolicy,
}

/// Summary of what a rewrite did, consumed by the topology validator.
#[derive(Debug, Clone, Default)]
pub struct RewriteReport {
    /// Names of the nodes synthesized by this run (empty on a re-run).
    pub added_nodes: Vec<String>,
    pub rules_applied: usize,
    /// Out-of-band reads the rewired graph relies on.
    pub slots: Vec<SlotBinding>,
    /// Nodes whose outgoing branch must stay empty.
    pub accumulators: Vec<String>,
    /// Encoded feedback edge: the storage-confirmation source and the
    /// iterator it re-enters.
    pub feedback: Option<(String, String)>,
}

/// Applies the standard repair sequence to a workflow document.
pub struct Rewriter {
    policy: RewritePolicy,
}

impl Rewriter {
    pub fn new(policy: RewritePolicy) -> Self {
        Self { policy }
    }

    /// Synthesizes the missing accumulation nodes and rewires the graph so
    /// both batch loops follow the accumulate-then-release pattern.
    ///
    /// Idempotent: re-running on an already repaired document reproduces
    /// the same node set and the same connection map.
    pub fn rewire(&self, doc: &mut WorkflowDocument) -> Result<RewriteReport, RewriteError> {
        doc.ensure_unique_names()?;

        let synth = NodeSynthesizer::anchored_at(doc, names::CHUNK_CONTENT, self.policy.on_empty)?;
        let chunk_loop_present = doc.has_node(names::LOOP_OVER_CHUNK_BATCHES);

        let mut wanted: Vec<(&str, NodeRole)> = vec![
            (names::AGGREGATE_ALL_CHUNKS, NodeRole::Accumulator),
            (
                names::COMBINE_ALL_CHUNKS,
                NodeRole::Combiner {
                    reads_from: names::AGGREGATE_ALL_CHUNKS.to_string(),
                },
            ),
        ];
        if chunk_loop_present {
            // Without the chunk iterator the releaser would be an orphan.
            wanted.push((
                names::RELEASE_DOCUMENTS,
                NodeRole::Releaser {
                    reads_from: names::WAIT_FOR_VECTORS.to_string(),
                },
            ));
            if self.policy.feedback == FeedbackStyle::Signal {
                wanted.push((names::BATCH_COMPLETION_SIGNAL, NodeRole::Relay));
            }
        }

        let mut report = RewriteReport::default();
        let mut new_nodes = Vec::new();
        for (name, role) in &wanted {
            if matches!(role, NodeRole::Accumulator) {
                report.accumulators.push(name.to_string());
            }
            if let Some(producer) = role.reads_from() {
                report.slots.push(SlotBinding {
                    producer: producer.to_string(),
                    consumer: name.to_string(),
                });
            }
            if doc.has_node(name) {
                continue;
            }
            new_nodes.push(synth.synthesize(role, name).node);
            report.added_nodes.push(name.to_string());
        }
        doc.add_nodes(new_nodes)?;

        let index = doc.node_names();
        let rules = self.rule_table(&index, chunk_loop_present, &mut report);

        // Functional pass: every rule must apply to the new map before it
        // replaces the document's connections.
        let mut next = doc.connections.clone();
        for rule in &rules {
            rule.apply(&mut next, &index)?;
        }
        report.rules_applied = rules.len();
        doc.connections = next;

        Ok(report)
    }

    /// The ordered fix table for this graph: detaches first, then one
    /// full-branch-replace per correction, loop branches before done
    /// branches.
    fn rule_table(
        &self,
        index: &AHashSet<&str>,
        chunk_loop_present: bool,
        report: &mut RewriteReport,
    ) -> Vec<RewireRule> {
        let present = |name: &str| index.contains(name);
        let targets = |desired: &[&str]| -> Vec<Connection> {
            desired
                .iter()
                .filter(|name| present(name))
                .map(|name| Connection::main(*name))
                .collect()
        };

        let mut rules = Vec::new();

        if present(names::BATCH_COMPLETION_METRICS) {
            // Historically triggered from inside the chunk loop; its only
            // correct source is restated below.
            rules.push(RewireRule::detach(names::BATCH_COMPLETION_METRICS));
        }

        if present(names::LOOP_OVER_BATCHES) {
            rules.push(RewireRule::replace(
                names::LOOP_OVER_BATCHES,
                LOOP_BRANCH,
                targets(&[
                    names::DOWNLOAD_CONTENT_BATCH,
                    names::BATCH_COMPLETION_NOTIFICATION,
                ]),
            ));
            rules.push(RewireRule::replace(
                names::LOOP_OVER_BATCHES,
                DONE_BRANCH,
                targets(&[names::COMBINE_ALL_CHUNKS]),
            ));
        }

        rules.push(RewireRule::replace(
            names::CHUNK_CONTENT,
            0,
            targets(&[names::AGGREGATE_ALL_CHUNKS]),
        ));

        // Accumulator isolation: the branch exists but stays empty.
        rules.push(RewireRule::replace(
            names::AGGREGATE_ALL_CHUNKS,
            0,
            Vec::new(),
        ));

        rules.push(RewireRule::replace(
            names::COMBINE_ALL_CHUNKS,
            0,
            targets(&[names::BATCH_CHUNK_GROUPS]),
        ));

        if chunk_loop_present {
            rules.push(RewireRule::replace(
                names::LOOP_OVER_CHUNK_BATCHES,
                LOOP_BRANCH,
                targets(&[names::EXTRACT_CHUNKS_FROM_BATCH]),
            ));
            rules.push(RewireRule::replace(
                names::LOOP_OVER_CHUNK_BATCHES,
                DONE_BRANCH,
                targets(&[names::RELEASE_DOCUMENTS]),
            ));

            for store in [names::STORE_VECTORS_MEETINGS, names::STORE_VECTORS_STRATEGY] {
                if present(store) {
                    rules.push(RewireRule::replace(
                        store,
                        0,
                        targets(&[names::COLLECT_STORAGE_RESULTS]),
                    ));
                }
            }

            if present(names::COLLECT_STORAGE_RESULTS) {
                match self.policy.feedback {
                    FeedbackStyle::Direct => {
                        rules.push(RewireRule::replace(
                            names::COLLECT_STORAGE_RESULTS,
                            0,
                            targets(&[names::LOOP_OVER_CHUNK_BATCHES]),
                        ));
                    }
                    FeedbackStyle::Signal => {
                        rules.push(RewireRule::replace(
                            names::COLLECT_STORAGE_RESULTS,
                            0,
                            targets(&[names::BATCH_COMPLETION_SIGNAL]),
                        ));
                        rules.push(RewireRule::replace(
                            names::BATCH_COMPLETION_SIGNAL,
                            0,
                            targets(&[names::LOOP_OVER_CHUNK_BATCHES]),
                        ));
                    }
                }
                report.feedback = Some((
                    names::COLLECT_STORAGE_RESULTS.to_string(),
                    names::LOOP_OVER_CHUNK_BATCHES.to_string(),
                ));
            }

            if present(names::BATCH_COMPLETION_METRICS) {
                rules.push(RewireRule::replace(
                    names::RELEASE_DOCUMENTS,
                    0,
                    targets(&[names::BATCH_COMPLETION_METRICS]),
                ));
                rules.push(RewireRule::replace(
                    names::BATCH_COMPLETION_METRICS,
                    0,
                    targets(&[names::PREPARE_DOCUMENTS]),
                ));
            } else {
                rules.push(RewireRule::replace(
                    names::RELEASE_DOCUMENTS,
                    0,
                    targets(&[names::PREPARE_DOCUMENTS]),
                ));
            }
        }

        rules
    }
}
