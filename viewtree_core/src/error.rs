// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Every fallible operation in this crate returns one of these. Misusing a
//! [`NodeId`] that the tree never issued is a programming error and panics
//! instead.

use alloc::string::String;
use core::fmt;

use crate::tree::NodeId;

/// Rendering used in [`ReentrantMutationError`] for a binding that one of the
/// two invocations did not produce.
pub const UNBOUND: &str = "<unbound>";

/// A node's update callback was not idempotent.
///
/// Raised by [`Tree::check_no_changes`](crate::tree::Tree::check_no_changes)
/// when two consecutive invocations of the same callback bind different
/// values. The traversal stops at the first violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReentrantMutationError {
    /// The node whose callback changed its bindings.
    pub node: NodeId,
    /// Position of the first differing binding.
    pub binding: usize,
    /// Debug rendering of the value bound by the first invocation.
    pub previous: String,
    /// Debug rendering of the value bound by the second invocation.
    pub current: String,
}

impl fmt::Display for ReentrantMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "binding {} of node {:?} changed after it was checked: previous value {}, current value {}",
            self.binding, self.node, self.previous, self.current
        )
    }
}

impl core::error::Error for ReentrantMutationError {}

/// Attempted to mutate a frozen value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImmutableValueError;

impl fmt::Display for ImmutableValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cannot mutate a frozen value")
    }
}

impl core::error::Error for ImmutableValueError {}

/// Errors from [`Tree::attach_child`](crate::tree::Tree::attach_child).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachError {
    /// `child` is `parent` itself or one of its ancestors.
    WouldCycle {
        /// The requested new parent.
        parent: NodeId,
        /// The node that was to be moved.
        child: NodeId,
    },
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldCycle { parent, child } => write!(
                f,
                "cannot attach {child:?} under {parent:?}: it is an ancestor of the new parent"
            ),
        }
    }
}

impl core::error::Error for AttachError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn reentrant_mutation_message_names_both_values() {
        let err = ReentrantMutationError {
            node: NodeId(3),
            binding: 0,
            previous: "1".into(),
            current: "2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("NodeId(3)"), "got: {msg}");
        assert!(msg.contains("previous value 1"), "got: {msg}");
        assert!(msg.contains("current value 2"), "got: {msg}");
    }

    #[test]
    fn attach_error_message() {
        let err = AttachError::WouldCycle {
            parent: NodeId(2),
            child: NodeId(1),
        };
        assert_eq!(
            err.to_string(),
            "cannot attach NodeId(1) under NodeId(2): it is an ancestor of the new parent"
        );
    }
}
