use thiserror::Error;

/// Errors that can occur while loading or saving a workflow document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read workflow file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write workflow file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by graph model operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found in the workflow graph")]
    NodeNotFound(String),

    #[error(
        "Duplicate node name '{0}': names are the addressing key for connections and must be unique"
    )]
    DuplicateName(String),
}

/// Errors that can occur while applying the rewire rule sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Rewire rule '{rule}' references unknown node '{name}'")]
    UnknownNode { rule: String, name: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors reported by the post-rewrite topology validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Connection map entry of '{context}' references unknown node '{name}'")]
    DanglingConnection { name: String, context: String },

    #[error("Batch iterator '{node}' must expose exactly two branches, found {found}")]
    BranchArityViolation { node: String, found: usize },

    #[error("Done branch of iterator '{node}' must feed exactly one consumer, found {found}")]
    DoneBranchFanout { node: String, found: usize },

    #[error("Accumulator '{0}' must not emit downstream, but its output branch is non-empty")]
    AccumulatorNotIsolated(String),

    #[error("Node '{consumer}' reads the accumulated output of '{producer}', which does not exist")]
    UnboundSlot { producer: String, consumer: String },

    #[error("Node '{consumer}' must be driven by exactly one done branch, found {found}")]
    DoneTriggerViolation { consumer: String, found: usize },

    #[error("No feedback path from '{from}' back to iterator '{to}'")]
    FeedbackMissing { from: String, to: String },
}
