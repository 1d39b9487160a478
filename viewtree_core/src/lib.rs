// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-tracking view tree.
//!
//! `viewtree_core` keeps a hierarchy of view nodes that can each be marked
//! dirty, detached, reattached, and checked. It is `no_std` compatible (with
//! `alloc`) and uses array-based struct-of-arrays storage with index handles.
//!
//! # Architecture
//!
//! ```text
//!   mark_dirty / detach / reattach
//!       │
//!       ▼
//!   Tree (dirty, pending, attached flags)
//!       │
//!       ▼
//!   check() ──► pre-order walk ──► Update::update(cx) per node
//!       │
//!       ▼
//!   check_no_changes() ──► two invocations per node ──► ReentrantMutationError
//! ```
//!
//! **[`tree`]**: The node arena, the flag operations, and the traversals.
//! Marking a node dirty flags every ancestor as pending so a traversal from
//! any ancestor reaches it; detached subtrees are skipped until reattached.
//!
//! **[`config`]**: [`TreeConfig`](config::TreeConfig) and the
//! [`CheckStrategy`](config::CheckStrategy) fixed at tree creation.
//!
//! **[`dirty`]**: Change-log channels via `understory_dirty`, drained by
//! [`Tree::take_changes`](tree::Tree::take_changes).
//!
//! **[`error`]**: Error types for verification, frozen values, and
//! re-parenting.
//!
//! **[`frozen`]**: [`Frozen`](frozen::Frozen) values and the shared
//! [`EMPTY_OBJ`](frozen::EMPTY_OBJ) / [`EMPTY_ARRAY`](frozen::EMPTY_ARRAY)
//! singletons.
//!
//! **[`locale`]**: Static locale tables with plural selection.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! traversal instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node visit
//!   and skip events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod dirty;
pub mod error;
pub mod frozen;
pub mod locale;
pub mod trace;
pub mod tree;
