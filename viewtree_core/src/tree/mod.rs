// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-tracking tree data model.
//!
//! A *node* stands for one view. Each node has:
//!
//! - An identity ([`NodeId`]), an index into the tree's arrays. Nodes are
//!   never destroyed by the tree; tearing a view down is the owner's job.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. The parent link is a plain index, never an owning reference.
//! - Check state: `dirty`, `pending` (a descendant is dirty), and
//!   `attached`, changed only through [`mark_dirty`](Tree::mark_dirty),
//!   [`detach`](Tree::detach), [`reattach`](Tree::reattach), and the
//!   traversals.
//! - An optional [`Update`] callback run by [`check`](Tree::check) and
//!   [`check_no_changes`](Tree::check_no_changes).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Example
//!
//! ```
//! use viewtree_core::tree::{Tree, update_fn};
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! let list = tree.create_node(root);
//! let row = tree.create_node_with(list, update_fn(|cx| cx.bind("row")));
//!
//! tree.mark_dirty(row);
//! tree.detach(list);
//! assert_eq!(tree.check(root).updated, 1);
//! assert!(tree.is_dirty(row));
//!
//! tree.reattach(list);
//! assert_eq!(tree.check(root).updated, 3);
//! assert!(!tree.is_dirty(row));
//! ```

mod check;
mod id;
mod store;
mod traverse;
mod update;

pub use check::CheckSummary;
pub use id::{INVALID, NodeId};
pub use store::{Tree, TreeChanges};
pub use traverse::{Ancestors, Children};
pub use update::{CheckMode, Update, UpdateCx, UpdateFn, update_fn};
