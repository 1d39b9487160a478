// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use viewtree_core::config::CheckStrategy;
use viewtree_core::trace::{
    CheckBeginEvent, CheckEndEvent, NodeSkipEvent, NodeVisitEvent, SkipReason, TraceSink,
    ViolationEvent,
};
use viewtree_core::tree::CheckMode;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    indent: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            indent: false,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            indent: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            indent: false,
        }
    }

    /// Indents visit lines by their depth.
    #[must_use]
    pub fn indented(mut self) -> Self {
        self.indent = true;
        self
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

pub(crate) fn mode_name(mode: CheckMode) -> &'static str {
    match mode {
        CheckMode::Check => "check",
        CheckMode::Verify => "verify",
    }
}

pub(crate) fn strategy_name(strategy: CheckStrategy) -> &'static str {
    match strategy {
        CheckStrategy::OnPush => "on-push",
        CheckStrategy::Always => "always",
    }
}

pub(crate) fn reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Detached => "detached",
        SkipReason::Clean => "clean",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_check_begin(&mut self, e: &CheckBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[check:begin] root={} mode={} strategy={}",
            e.root.index(),
            mode_name(e.mode),
            strategy_name(e.strategy),
        );
    }

    fn on_check_end(&mut self, e: &CheckEndEvent) {
        let _ = writeln!(
            self.writer,
            "[check:end] root={} mode={} updated={} skipped_detached={} skipped_clean={}",
            e.root.index(),
            mode_name(e.mode),
            e.summary.updated,
            e.summary.skipped_detached,
            e.summary.skipped_clean,
        );
    }

    fn on_violation(&mut self, e: &ViolationEvent) {
        let _ = writeln!(
            self.writer,
            "[violation] node={} binding={}",
            e.node.index(),
            e.binding,
        );
    }

    fn on_node_visit(&mut self, e: &NodeVisitEvent) {
        let pad = if self.indent { e.depth as usize * 2 } else { 0 };
        let _ = writeln!(
            self.writer,
            "{:pad$}[visit] node={} depth={} mode={}",
            "",
            e.node.index(),
            e.depth,
            mode_name(e.mode),
        );
    }

    fn on_node_skip(&mut self, e: &NodeSkipEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] node={} reason={}",
            e.node.index(),
            reason_name(e.reason),
        );
    }
}
