// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::Tree;

/// An iterator over the direct children of a node, in insertion order.
///
/// Created by [`Tree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a Tree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a Tree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(NodeId(idx))
    }
}

/// An iterator over the ancestors of a node, nearest first.
///
/// Created by [`Tree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a Tree,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a Tree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.parent[idx as usize];
        Some(NodeId(idx))
    }
}
