// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by structural edits.

use crate::types::NodeId;

/// Result alias for fallible scene edits.
pub type SceneResult<T> = Result<T, SceneError>;

/// Why an insert was refused.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyViolation {
    /// The target is a leaf and cannot own children.
    #[error("target is not a group")]
    NotAGroup,
    /// A node cannot be inserted into itself.
    #[error("node inserted into itself")]
    SelfInsert,
    /// The child is an ancestor of the target; inserting it would form a cycle.
    #[error("child is an ancestor of the target")]
    Cycle,
    /// The root has no parent and cannot be moved.
    #[error("the root cannot be reparented")]
    Root,
}

/// Error returned by [`Scene`](crate::Scene) edits.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The edit would break the tree shape.
    #[error("invalid hierarchy inserting {child:?} into {parent:?}: {reason}")]
    InvalidHierarchy {
        /// Target group.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
        /// What was wrong.
        reason: HierarchyViolation,
    },

    /// The handle refers to a destroyed node.
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),
}

impl SceneError {
    pub(crate) fn hierarchy(parent: NodeId, child: NodeId, reason: HierarchyViolation) -> Self {
        Self::InvalidHierarchy {
            parent,
            child,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_violation() {
        let err = SceneError::hierarchy(
            NodeId::new(1, 1),
            NodeId::new(2, 1),
            HierarchyViolation::Cycle,
        );
        assert!(
            err.to_string().contains("ancestor"),
            "message should explain the cycle"
        );
        assert!(
            SceneError::StaleNode(NodeId::new(3, 2))
                .to_string()
                .starts_with("stale node handle"),
            "stale prefix is stable"
        );
        assert_eq!(
            HierarchyViolation::NotAGroup.to_string(),
            "target is not a group"
        );
    }
}
