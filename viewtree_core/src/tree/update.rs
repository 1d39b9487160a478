// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node update callbacks.
//!
//! A node's callback refreshes the view it stands for. During a traversal
//! the callback receives an [`UpdateCx`], through which it can report the
//! values it binds and reach back into the tree.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use super::id::NodeId;
use super::store::Tree;

/// How a traversal invokes callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckMode {
    /// Normal operation: one invocation per visited node.
    Check,
    /// Verification: two consecutive invocations whose bindings must match.
    Verify,
}

/// The update callback attached to a node.
pub trait Update {
    /// Refreshes the node's bound state.
    fn update(&mut self, cx: &mut UpdateCx<'_>);
}

/// An [`Update`] backed by a closure. Created by [`update_fn`].
pub struct UpdateFn<F>(F);

impl<F> fmt::Debug for UpdateFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateFn").finish_non_exhaustive()
    }
}

impl<F> Update for UpdateFn<F>
where
    F: FnMut(&mut UpdateCx<'_>),
{
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        (self.0)(cx);
    }
}

/// Wraps a closure as an [`Update`].
///
/// ```
/// use viewtree_core::tree::{Tree, update_fn};
///
/// let mut tree = Tree::new();
/// let root = tree.root();
/// let node = tree.create_node_with(root, update_fn(|cx| cx.bind(42_u32)));
/// tree.mark_dirty(node);
/// assert_eq!(tree.check(root).updated, 2);
/// ```
pub fn update_fn<F>(f: F) -> UpdateFn<F>
where
    F: FnMut(&mut UpdateCx<'_>),
{
    UpdateFn(f)
}

/// A value bound by a callback, comparable across invocations.
pub(crate) trait BoundValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn same_as(&self, other: &dyn BoundValue) -> bool;
}

impl<T> BoundValue for T
where
    T: Any + PartialEq + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_as(&self, other: &dyn BoundValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Context handed to a callback while its node is being updated.
pub struct UpdateCx<'a> {
    tree: &'a mut Tree,
    node: NodeId,
    mode: CheckMode,
    bindings: Vec<Box<dyn BoundValue>>,
}

impl fmt::Debug for UpdateCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateCx")
            .field("node", &self.node)
            .field("mode", &self.mode)
            .field("bindings", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

impl<'a> UpdateCx<'a> {
    pub(crate) fn new(tree: &'a mut Tree, node: NodeId, mode: CheckMode) -> Self {
        Self {
            tree,
            node,
            mode,
            bindings: Vec::new(),
        }
    }

    /// Returns the node being updated.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the mode of the running traversal.
    #[must_use]
    pub fn mode(&self) -> CheckMode {
        self.mode
    }

    /// Records a value the view binds.
    ///
    /// Bindings are only retained in [`CheckMode::Verify`], where the
    /// sequence produced by one invocation is compared against the next.
    pub fn bind<T>(&mut self, value: T)
    where
        T: PartialEq + fmt::Debug + 'static,
    {
        if self.mode == CheckMode::Verify {
            self.bindings.push(Box::new(value));
        }
    }

    /// Returns the tree, for marking, detaching, or creating nodes mid-traversal.
    ///
    /// The node being updated has its callback lifted out while it runs, so
    /// re-entering the tree never invokes it recursively.
    pub fn tree(&mut self) -> &mut Tree {
        self.tree
    }

    pub(crate) fn into_bindings(self) -> Vec<Box<dyn BoundValue>> {
        self.bindings
    }
}
