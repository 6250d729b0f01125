use ahash::AHashSet;

use crate::error::RewriteError;
use crate::workflow::{Connection, ConnectionMap};

/// A single declarative topology correction.
///
/// Rules re-state the complete desired wiring of a branch instead of
/// patching it, so applying a rule twice is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewireRule {
    /// Full-replace the target list of one output branch of `source`.
    ReplaceBranch {
        source: String,
        branch: usize,
        targets: Vec<Connection>,
    },
    /// Strip every connection pointing at `target`, across all sources and
    /// branches. Used to un-wire a node triggered from the wrong place
    /// before re-stating its correct source.
    DetachTarget { target: String },
}

impl RewireRule {
    pub fn replace(source: &str, branch: usize, targets: Vec<Connection>) -> Self {
        RewireRule::ReplaceBranch {
            source: source.to_string(),
            branch,
            targets,
        }
    }

    pub fn detach(target: &str) -> Self {
        RewireRule::DetachTarget {
            target: target.to_string(),
        }
    }

    /// Short description used in failure messages and reports.
    pub fn describe(&self) -> String {
        match self {
            RewireRule::ReplaceBranch { source, branch, .. } => {
                format!("replace branch {branch} of '{source}'")
            }
            RewireRule::DetachTarget { target } => format!("detach '{target}'"),
        }
    }

    /// Applies the rule to a connection map. `names` is the post-synthesis
    /// node name index; a rule that references a name outside it fails
    /// rather than writing a dangling edge.
    pub(crate) fn apply(
        &self,
        map: &mut ConnectionMap,
        names: &AHashSet<&str>,
    ) -> Result<(), RewriteError> {
        match self {
            RewireRule::ReplaceBranch {
                source,
                branch,
                targets,
            } => {
                if !names.contains(source.as_str()) {
                    return Err(RewriteError::UnknownNode {
                        rule: self.describe(),
                        name: source.clone(),
                    });
                }
                if let Some(bad) = targets.iter().find(|t| !names.contains(t.node.as_str())) {
                    return Err(RewriteError::UnknownNode {
                        rule: self.describe(),
                        name: bad.node.clone(),
                    });
                }
                map.set_branch(source, *branch, targets.clone());
                Ok(())
            }
            RewireRule::DetachTarget { target } => {
                map.remove_target(target);
                Ok(())
            }
        }
    }
}
