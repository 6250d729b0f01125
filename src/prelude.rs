//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the flowmend crate so a
//! repair can be written without importing each module individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowmend::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut doc = WorkflowDocument::from_file("workflow.json")?;
//!
//! let rewriter = Rewriter::new(RewritePolicy::default());
//! let report = rewriter.rewire(&mut doc)?;
//! TopologyValidator::new(&doc).check_all(&report)?;
//!
//! doc.save("workflow-fixed.json")?;
//! # Ok(())
//! # }
//! ```

// Core rewrite and validation
pub use crate::rewrite::{FeedbackStyle, RewireRule, Rewriter, RewritePolicy, RewriteReport};
pub use crate::validate::TopologyValidator;

// Graph model
pub use crate::workflow::{
    Connection, ConnectionMap, DONE_BRANCH, LOOP_BRANCH, Node, NodePorts, Position,
    WorkflowDocument,
};

// Node synthesis
pub use crate::synth::{EmptyBatchPolicy, NodeRole, NodeSynthesizer, SlotBinding};

// Error types
pub use crate::error::{DocumentError, GraphError, RewriteError, ValidationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
