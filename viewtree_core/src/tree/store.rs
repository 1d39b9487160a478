// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with topology, flag, and change-log management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, NodeId};
use super::traverse::{Ancestors, Children};
use super::update::Update;
use crate::config::TreeConfig;
use crate::dirty;
use crate::error::AttachError;

/// Structural changes recorded since the last [`Tree::take_changes`].
///
/// Entries are raw slot indices in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeChanges {
    /// Nodes whose attached flag flipped.
    pub attachment: Vec<u32>,
    /// Nodes that gained or lost a child.
    pub topology: Vec<u32>,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.attachment.clear();
        self.topology.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attachment.is_empty() && self.topology.is_empty()
    }
}

/// A change-tracking tree of view nodes.
///
/// Every node owns an ordered list of children and records its parent as a
/// slot index, so the arena is the only owner and no reference cycle can
/// form. The root is created with the tree and is always attached.
///
/// Each node carries three flags:
///
/// - `dirty`: the node itself needs its callback run.
/// - `pending`: some descendant is dirty, so a traversal must pass through.
/// - `attached`: the node and its subtree take part in traversal.
pub struct Tree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Check state --
    pub(crate) dirty: Vec<bool>,
    pub(crate) pending: Vec<bool>,
    pub(crate) attached: Vec<bool>,
    pub(crate) update: Vec<Option<Box<dyn Update>>>,

    // -- Traversal bookkeeping --
    pub(crate) active_checks: u32,
    pub(crate) deferred: Vec<bool>,
    pub(crate) deferred_list: Vec<u32>,
    /// Set when a node's callback slot is written while a traversal runs.
    pub(crate) update_replaced: Vec<bool>,
    /// Epoch of the traversal that last ran each node's update step.
    pub(crate) visited: Vec<u32>,
    pub(crate) epoch: u32,

    // -- Change log --
    pub(crate) changes: DirtyTracker<u32>,

    pub(crate) config: TreeConfig,
    pub(crate) root: u32,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len())
            .field("config", &self.config)
            .field("active_checks", &self.active_checks)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree with a single root node and the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates a tree with a single root node.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        let mut tree = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            dirty: Vec::new(),
            pending: Vec::new(),
            attached: Vec::new(),
            update: Vec::new(),
            active_checks: 0,
            deferred: Vec::new(),
            deferred_list: Vec::new(),
            update_replaced: Vec::new(),
            visited: Vec::new(),
            epoch: 0,
            changes: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            config,
            root: 0,
        };
        tree.root = tree.alloc();
        tree
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    /// Returns the config the tree was created with.
    #[must_use]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Returns the number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Always `false`: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns whether `id` was issued by a tree of this size.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        (id.0 as usize) < self.len()
    }

    // -- Construction API --

    /// Creates a clean, attached node as the last child of `parent`.
    ///
    /// The node has no callback; traversals still visit it and clear its
    /// dirty flag. See [`set_update`](Self::set_update).
    pub fn create_node(&mut self, parent: NodeId) -> NodeId {
        self.validate(parent);
        let idx = self.alloc();
        self.link_last(parent.0, idx);
        self.changes.mark(parent.0, dirty::TOPOLOGY);
        NodeId(idx)
    }

    /// Creates a node with the given callback as the last child of `parent`.
    pub fn create_node_with(&mut self, parent: NodeId, update: impl Update + 'static) -> NodeId {
        let id = self.create_node(parent);
        self.update[id.0 as usize] = Some(Box::new(update));
        id
    }

    /// Replaces the callback of a node.
    pub fn set_update(&mut self, id: NodeId, update: impl Update + 'static) {
        self.validate(id);
        self.update[id.0 as usize] = Some(Box::new(update));
        self.note_update_replaced(id.0);
    }

    /// Removes the callback of a node, leaving it as a pass-through.
    ///
    /// A callback may clear itself; it is not invoked again.
    pub fn clear_update(&mut self, id: NodeId) {
        self.validate(id);
        self.update[id.0 as usize] = None;
        self.note_update_replaced(id.0);
    }

    fn note_update_replaced(&mut self, idx: u32) {
        if self.active_checks > 0 {
            self.update_replaced[idx as usize] = true;
        }
    }

    /// Moves `child` and its subtree to be the last child of `parent`.
    ///
    /// Pending flags are recomputed on the old ancestry and propagated to the
    /// new one, so a dirty node inside the moved subtree is still reached.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::WouldCycle`] if `child` is `parent` or one of
    /// its ancestors (this includes moving the root).
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AttachError> {
        self.validate(parent);
        self.validate(child);
        if self.ancestors(parent).any(|a| a == child) {
            return Err(AttachError::WouldCycle { parent, child });
        }

        let (p, c) = (parent.0, child.0);
        let old = self.parent[c as usize];
        if old != INVALID {
            self.unlink_from_parent(c);
            self.settle_pending(old);
            self.changes.mark(old, dirty::TOPOLOGY);
        }

        self.link_last(p, c);
        if self.needs_check(c) {
            self.propagate_pending(p);
        }
        self.changes.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    // -- Queries --

    /// Returns the parent of a node, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.0 as usize];
        (p != INVALID).then_some(NodeId(p))
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.0 as usize])
    }

    /// Returns an iterator over the node itself and then its ancestors, up to
    /// the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, id.0)
    }

    /// Returns whether the node itself needs its callback run.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.dirty[id.0 as usize]
    }

    /// Returns whether some descendant of the node is dirty.
    #[must_use]
    pub fn has_pending(&self, id: NodeId) -> bool {
        self.validate(id);
        self.pending[id.0 as usize]
    }

    /// Returns whether the node takes part in traversal.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.validate(id);
        self.attached[id.0 as usize]
    }

    // -- Flag operations --

    /// Marks a node dirty and flags every ancestor as pending, so a traversal
    /// from any ancestor reaches it.
    ///
    /// No-op if the node is already dirty. Never runs a traversal.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.0 as usize;
        if self.dirty[idx] {
            return;
        }
        self.dirty[idx] = true;
        self.propagate_pending(self.parent[idx]);
    }

    /// Excludes a node and its subtree from traversal until reattached.
    ///
    /// Idempotent. Dirty flags are untouched. The root is always attached, so
    /// detaching it does nothing.
    pub fn detach(&mut self, id: NodeId) {
        self.validate(id);
        if id.0 == self.root || !self.attached[id.0 as usize] {
            return;
        }
        self.attached[id.0 as usize] = false;
        self.changes.mark(id.0, dirty::ATTACHMENT);
    }

    /// Includes a detached node in traversal again.
    ///
    /// Idempotent. A node reattached while a traversal is running stays
    /// excluded from that traversal and takes part in the next one.
    pub fn reattach(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.0 as usize;
        if self.attached[idx] {
            return;
        }
        self.attached[idx] = true;
        if self.active_checks > 0 && !self.deferred[idx] {
            self.deferred[idx] = true;
            self.deferred_list.push(id.0);
        }
        self.changes.mark(id.0, dirty::ATTACHMENT);
    }

    // -- Change log --

    /// Drains the structural change log.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer.
    pub fn take_changes_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();
        changes.attachment = self
            .changes
            .drain(dirty::ATTACHMENT)
            .deterministic()
            .run()
            .collect();
        changes.topology = self
            .changes
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
    }

    // -- Internal helpers --

    /// Panics if the handle was not issued by this tree.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.contains(id),
            "unknown NodeId: {id:?} (tree has {} nodes)",
            self.len()
        );
    }

    /// Pushes a fresh, parentless, clean, attached slot.
    fn alloc(&mut self) -> u32 {
        let idx = u32::try_from(self.parent.len()).unwrap_or(INVALID);
        assert!(idx != INVALID, "node arena exhausted");
        self.parent.push(INVALID);
        self.first_child.push(INVALID);
        self.next_sibling.push(INVALID);
        self.prev_sibling.push(INVALID);
        self.dirty.push(false);
        self.pending.push(false);
        self.attached.push(true);
        self.update.push(None);
        self.deferred.push(false);
        self.update_replaced.push(false);
        self.visited.push(0);
        idx
    }

    /// Appends `c` to the child list of `p`.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Whether a traversal must reach `idx`: it is dirty or has a dirty
    /// descendant.
    pub(crate) fn needs_check(&self, idx: u32) -> bool {
        self.dirty[idx as usize] || self.pending[idx as usize]
    }

    /// Whether any child of `idx` needs a check.
    pub(crate) fn any_child_needs_check(&self, idx: u32) -> bool {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if self.needs_check(child) {
                return true;
            }
            child = self.next_sibling[child as usize];
        }
        false
    }

    /// Sets `pending` on `idx` and its ancestors, stopping at the first one
    /// already pending.
    pub(crate) fn propagate_pending(&mut self, mut idx: u32) {
        while idx != INVALID && !self.pending[idx as usize] {
            self.pending[idx as usize] = true;
            idx = self.parent[idx as usize];
        }
    }

    /// Recomputes `pending` on `idx` and its ancestors from their children,
    /// stopping once a value does not change.
    pub(crate) fn settle_pending(&mut self, mut idx: u32) {
        while idx != INVALID {
            let pending = self.any_child_needs_check(idx);
            if self.pending[idx as usize] == pending {
                return;
            }
            self.pending[idx as usize] = pending;
            idx = self.parent[idx as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn new_tree_has_attached_clean_root() {
        let tree = Tree::new();
        let root = tree.root();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_attached(root));
        assert!(!tree.is_dirty(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn create_node_appends_in_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let b = tree.create_node(root);
        let c = tree.create_node(a);

        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.parent(c), Some(a));
        assert!(!tree.is_dirty(c), "new nodes start clean");
        assert!(tree.is_attached(c), "new nodes start attached");
    }

    #[test]
    fn mark_dirty_flags_ancestors_pending() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let b = tree.create_node(root);
        let c = tree.create_node(a);

        tree.mark_dirty(c);
        assert!(tree.is_dirty(c));
        assert!(!tree.is_dirty(a), "ancestors are pending, not dirty");
        assert!(tree.has_pending(a));
        assert!(tree.has_pending(root));
        assert!(!tree.has_pending(b));
    }

    #[test]
    fn detach_is_idempotent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        tree.detach(a);
        tree.detach(a);
        assert!(!tree.is_attached(a));
        let changes = tree.take_changes();
        assert_eq!(changes.attachment, vec![a.index()]);
    }

    #[test]
    fn reattach_is_idempotent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let _ = tree.take_changes();

        tree.reattach(a);
        assert!(tree.is_attached(a));
        assert!(
            tree.take_changes().attachment.is_empty(),
            "reattaching an attached node records nothing"
        );
    }

    #[test]
    fn root_cannot_be_detached() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.detach(root);
        assert!(tree.is_attached(root));
    }

    #[test]
    fn detach_keeps_dirty_flag() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        tree.mark_dirty(a);
        tree.detach(a);
        assert!(tree.is_dirty(a));
    }

    #[test]
    fn attach_child_moves_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let b = tree.create_node(root);
        let c = tree.create_node(a);

        tree.attach_child(b, c).unwrap();
        assert_eq!(tree.parent(c), Some(b));
        assert!(tree.children(a).next().is_none());
        assert_eq!(tree.children(b).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn attach_child_rejects_ancestor() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let c = tree.create_node(a);

        assert_eq!(
            tree.attach_child(c, a),
            Err(AttachError::WouldCycle {
                parent: c,
                child: a
            })
        );
        assert_eq!(
            tree.attach_child(a, a),
            Err(AttachError::WouldCycle {
                parent: a,
                child: a
            })
        );
        assert!(tree.attach_child(c, root).is_err(), "root is everyone's ancestor");
        assert_eq!(tree.parent(c), Some(a), "failed attach leaves topology alone");
    }

    #[test]
    fn attach_child_carries_pending() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let b = tree.create_node(root);
        let c = tree.create_node(a);

        tree.mark_dirty(c);
        tree.attach_child(b, c).unwrap();
        assert!(!tree.has_pending(a), "old parent no longer leads to a dirty node");
        assert!(tree.has_pending(b));
        assert!(tree.has_pending(root));
    }

    #[test]
    fn topology_changes_are_logged() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let b = tree.create_node(root);
        let c = tree.create_node(a);
        let first = tree.take_changes();
        assert_eq!(first.topology, vec![root.index(), a.index()]);

        tree.attach_child(b, c).unwrap();
        let second = tree.take_changes();
        assert_eq!(second.topology, vec![a.index(), b.index()]);
        assert!(tree.take_changes().is_empty(), "changes drain");
    }

    #[test]
    fn ancestors_walks_to_root() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node(root);
        let c = tree.create_node(a);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![c, a, root]);
    }

    #[test]
    #[should_panic(expected = "unknown NodeId")]
    fn foreign_handle_panics() {
        let mut big = Tree::new();
        let root = big.root();
        let _ = big.create_node(root);
        let foreign = big.create_node(root);

        let small = Tree::new();
        let _ = small.is_dirty(foreign);
    }
}
