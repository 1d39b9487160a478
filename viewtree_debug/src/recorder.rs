// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Node handles are stored as their raw
//! slot index.

use viewtree_core::config::CheckStrategy;
use viewtree_core::trace::{
    CheckBeginEvent, CheckEndEvent, NodeSkipEvent, NodeVisitEvent, SkipReason, TraceSink,
    ViolationEvent,
};
use viewtree_core::tree::{CheckMode, CheckSummary};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CHECK_BEGIN: u8 = 1;
const TAG_CHECK_END: u8 = 2;
const TAG_VIOLATION: u8 = 3;
const TAG_NODE_VISIT: u8 = 4;
const TAG_NODE_SKIP: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_mode(&mut self, m: CheckMode) {
        self.write_u8(match m {
            CheckMode::Check => 0,
            CheckMode::Verify => 1,
        });
    }

    fn write_strategy(&mut self, s: CheckStrategy) {
        self.write_u8(match s {
            CheckStrategy::OnPush => 0,
            CheckStrategy::Always => 1,
        });
    }

    fn write_reason(&mut self, r: SkipReason) {
        self.write_u8(match r {
            SkipReason::Detached => 0,
            SkipReason::Clean => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_check_begin(&mut self, e: &CheckBeginEvent) {
        self.write_u8(TAG_CHECK_BEGIN);
        self.write_u32(e.root.index());
        self.write_mode(e.mode);
        self.write_strategy(e.strategy);
    }

    fn on_check_end(&mut self, e: &CheckEndEvent) {
        self.write_u8(TAG_CHECK_END);
        self.write_u32(e.root.index());
        self.write_mode(e.mode);
        self.write_u32(e.summary.updated);
        self.write_u32(e.summary.skipped_detached);
        self.write_u32(e.summary.skipped_clean);
    }

    fn on_violation(&mut self, e: &ViolationEvent) {
        self.write_u8(TAG_VIOLATION);
        self.write_u32(e.node.index());
        self.write_u64(e.binding as u64);
    }

    fn on_node_visit(&mut self, e: &NodeVisitEvent) {
        self.write_u8(TAG_NODE_VISIT);
        self.write_u32(e.node.index());
        self.write_u32(e.depth);
        self.write_mode(e.mode);
    }

    fn on_node_skip(&mut self, e: &NodeSkipEvent) {
        self.write_u8(TAG_NODE_SKIP);
        self.write_u32(e.node.index());
        self.write_reason(e.reason);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`CheckBeginEvent`].
    CheckBegin {
        /// Slot index of the start node.
        root: u32,
        /// Check or verify.
        mode: CheckMode,
        /// Strategy of the walked tree.
        strategy: CheckStrategy,
    },
    /// A [`CheckEndEvent`].
    CheckEnd {
        /// Slot index of the start node.
        root: u32,
        /// Check or verify.
        mode: CheckMode,
        /// Counts gathered by the traversal.
        summary: CheckSummary,
    },
    /// A [`ViolationEvent`].
    Violation {
        /// Slot index of the offending node.
        node: u32,
        /// Position of the first differing binding.
        binding: u64,
    },
    /// A [`NodeVisitEvent`].
    NodeVisit {
        /// Slot index of the updated node.
        node: u32,
        /// Distance from the start node.
        depth: u32,
        /// Check or verify.
        mode: CheckMode,
    },
    /// A [`NodeSkipEvent`].
    NodeSkip {
        /// Slot index of the skipped subtree's top.
        node: u32,
        /// Why it was skipped.
        reason: SkipReason,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated or unrecognized record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_mode(&mut self) -> Option<CheckMode> {
        match self.read_u8()? {
            0 => Some(CheckMode::Check),
            1 => Some(CheckMode::Verify),
            _ => None,
        }
    }

    fn read_strategy(&mut self) -> Option<CheckStrategy> {
        match self.read_u8()? {
            0 => Some(CheckStrategy::OnPush),
            1 => Some(CheckStrategy::Always),
            _ => None,
        }
    }

    fn read_reason(&mut self) -> Option<SkipReason> {
        match self.read_u8()? {
            0 => Some(SkipReason::Detached),
            1 => Some(SkipReason::Clean),
            _ => None,
        }
    }

    fn read_event(&mut self) -> Option<RecordedEvent> {
        let tag = self.read_u8()?;
        let event = match tag {
            TAG_CHECK_BEGIN => RecordedEvent::CheckBegin {
                root: self.read_u32()?,
                mode: self.read_mode()?,
                strategy: self.read_strategy()?,
            },
            TAG_CHECK_END => RecordedEvent::CheckEnd {
                root: self.read_u32()?,
                mode: self.read_mode()?,
                summary: CheckSummary {
                    updated: self.read_u32()?,
                    skipped_detached: self.read_u32()?,
                    skipped_clean: self.read_u32()?,
                },
            },
            TAG_VIOLATION => RecordedEvent::Violation {
                node: self.read_u32()?,
                binding: self.read_u64()?,
            },
            TAG_NODE_VISIT => RecordedEvent::NodeVisit {
                node: self.read_u32()?,
                depth: self.read_u32()?,
                mode: self.read_mode()?,
            },
            TAG_NODE_SKIP => RecordedEvent::NodeSkip {
                node: self.read_u32()?,
                reason: self.read_reason()?,
            },
            _ => return None,
        };
        Some(event)
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        let event = self.read_event();
        if event.is_none() {
            // Stop for good on a bad record.
            self.pos = self.data.len();
        }
        event
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
