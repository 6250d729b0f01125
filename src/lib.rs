//! # Flowmend - Workflow Graph Repair Engine
//!
//! **Flowmend** edits the control-flow graph of a batch-oriented
//! data-processing workflow expressed as named nodes and directed, indexed
//! connections. Given a workflow document with incorrect or missing wiring,
//! it produces a corrected graph that preserves two nested
//! iterate/accumulate/release patterns:
//!
//! 1. the document loop iterates over document batches and accumulates
//!    chunks, which are released as one set once iteration completes;
//! 2. the chunk loop iterates over chunk batches for vectorization and
//!    storage, and only after the last batch releases the documents for
//!    final storage.
//!
//! Batch iterator nodes expose two output branches: branch 0 fires once per
//! batch (the loop body), branch 1 fires exactly once after the last batch
//! (the done continuation). Every repair preserves this convention.
//!
//! ## Core Workflow
//!
//! 1. **Load**: parse the workflow JSON into a [`workflow::WorkflowDocument`].
//!    Fields the model does not know are preserved for round-tripping.
//! 2. **Rewire**: a [`rewrite::Rewriter`] synthesizes the missing
//!    accumulation nodes and applies a declarative, ordered table of
//!    [`rewrite::RewireRule`]s, each re-stating the complete wiring of one
//!    branch. The pass is idempotent and leaves the document untouched on
//!    failure.
//! 3. **Validate**: a [`validate::TopologyValidator`] checks branch arity,
//!    dangling references, accumulator isolation, and the encoded feedback
//!    loop before anything is saved.
//! 4. **Save**: write the repaired document back to JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowmend::prelude::*;
//! use flowmend::rewrite::FeedbackStyle;
//!
//! fn main() -> Result<()> {
//!     let mut doc = WorkflowDocument::from_file("workflow.json")?;
//!
//!     let policy = RewritePolicy {
//!         feedback: FeedbackStyle::Direct,
//!         ..RewritePolicy::default()
//!     };
//!     let report = Rewriter::new(policy).rewire(&mut doc)?;
//!     println!(
//!         "added {} nodes, applied {} rules",
//!         report.added_nodes.len(),
//!         report.rules_applied
//!     );
//!
//!     TopologyValidator::new(&doc).check_all(&report)?;
//!     doc.save("workflow-fixed.json")?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod prelude;
pub mod rewrite;
pub mod synth;
pub mod validate;
pub mod workflow;
