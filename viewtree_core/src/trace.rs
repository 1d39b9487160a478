// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for traversals.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! traversals call at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-node [`NodeVisitEvent`]
//!   and [`NodeSkipEvent`] events plus the corresponding `TraceSink` methods.

use crate::config::CheckStrategy;
use crate::tree::{CheckMode, CheckSummary, NodeId};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a traversal starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckBeginEvent {
    /// The node the traversal starts from.
    pub root: NodeId,
    /// Check or verify.
    pub mode: CheckMode,
    /// The strategy of the tree being walked.
    pub strategy: CheckStrategy,
}

/// Emitted when a traversal finishes, successfully or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckEndEvent {
    /// The node the traversal started from.
    pub root: NodeId,
    /// Check or verify.
    pub mode: CheckMode,
    /// Counts gathered up to the end (or the abort).
    pub summary: CheckSummary,
}

/// Emitted when verification finds a non-idempotent callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViolationEvent {
    /// The offending node.
    pub node: NodeId,
    /// Position of the first differing binding.
    pub binding: usize,
}

/// Why a subtree was not visited.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The node is detached (or was reattached during this traversal).
    Detached,
    /// Neither the node nor any descendant is dirty.
    Clean,
}

/// Emitted right before a node's update step runs.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeVisitEvent {
    /// The node being updated.
    pub node: NodeId,
    /// Distance from the traversal's start node.
    pub depth: u32,
    /// Check or verify.
    pub mode: CheckMode,
}

/// Emitted when a node and its subtree are skipped.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeSkipEvent {
    /// The node at the top of the skipped subtree.
    pub node: NodeId,
    /// Why it was skipped.
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from traversals.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a traversal starts.
    fn on_check_begin(&mut self, e: &CheckBeginEvent) {
        _ = e;
    }

    /// Called when a traversal ends.
    fn on_check_end(&mut self, e: &CheckEndEvent) {
        _ = e;
    }

    /// Called when verification fails.
    fn on_violation(&mut self, e: &ViolationEvent) {
        _ = e;
    }

    /// Called before each node update (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_visit(&mut self, e: &NodeVisitEvent) {
        _ = e;
    }

    /// Called for each skipped subtree (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_skip(&mut self, e: &NodeSkipEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CheckBeginEvent`].
    #[inline]
    pub fn check_begin(&mut self, e: &CheckBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_check_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CheckEndEvent`].
    #[inline]
    pub fn check_end(&mut self, e: &CheckEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_check_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViolationEvent`].
    #[inline]
    pub fn violation(&mut self, e: &ViolationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_violation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeVisitEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_visit(&mut self, e: &NodeVisitEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_visit(e);
        }
    }

    /// Emits a [`NodeSkipEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_skip(&mut self, e: &NodeSkipEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_skip(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let root = Tree::new().root();
        sink.on_check_begin(&CheckBeginEvent {
            root,
            mode: CheckMode::Check,
            strategy: CheckStrategy::OnPush,
        });
        sink.on_check_end(&CheckEndEvent {
            root,
            mode: CheckMode::Check,
            summary: CheckSummary::default(),
        });
        sink.on_violation(&ViolationEvent {
            node: root,
            binding: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tree = Tree::new();
        let root = tree.root();
        let summary = tree.check_traced(root, &mut Tracer::none());
        assert_eq!(summary, CheckSummary {
            updated: 0,
            skipped_detached: 0,
            skipped_clean: 1,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        use crate::tree::update_fn;

        #[derive(Default)]
        struct RecordingSink {
            begins: Vec<NodeId>,
            ends: Vec<CheckSummary>,
            violations: Vec<ViolationEvent>,
        }
        impl TraceSink for RecordingSink {
            fn on_check_begin(&mut self, e: &CheckBeginEvent) {
                self.begins.push(e.root);
            }
            fn on_check_end(&mut self, e: &CheckEndEvent) {
                self.ends.push(e.summary);
            }
            fn on_violation(&mut self, e: &ViolationEvent) {
                self.violations.push(*e);
            }
        }

        let mut tree = Tree::new();
        let root = tree.root();
        let mut n = 0_u32;
        let node = tree.create_node_with(
            root,
            update_fn(move |cx| {
                n += 1;
                cx.bind(n);
            }),
        );
        tree.mark_dirty(node);

        let mut sink = RecordingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        assert!(tree.check_no_changes_traced(root, &mut tracer).is_err());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.begins, &[root]);
        assert_eq!(sink.ends.len(), 1);
        assert_eq!(sink.ends[0].updated, 1, "root updated before the violation");
        assert_eq!(
            sink.violations,
            &[ViolationEvent {
                node,
                binding: 0
            }]
        );
    }
}
