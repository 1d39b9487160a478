// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-log channel constants.
//!
//! The per-node dirty and pending flags that drive traversal live directly
//! in the [`Tree`](crate::tree::Tree). Structural changes that hosts may want
//! to react to are recorded separately through [`understory_dirty`], one
//! channel per category, and drained by
//! [`Tree::take_changes`](crate::tree::Tree::take_changes).
//!
//! Both channels are local-only: marking a node records that node and
//! nothing else.

use understory_dirty::Channel;

/// A node's attached flag flipped (detach or reattach that changed state).
pub const ATTACHMENT: Channel = Channel::new(0);

/// A node gained or lost a child.
pub const TOPOLOGY: Channel = Channel::new(1);
