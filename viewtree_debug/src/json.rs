// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded traversals.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them as a JSON array of event objects, one per record, each
//! tagged by an `"event"` field.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::pretty::{mode_name, reason_name, strategy_name};
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| to_value(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// Converts one recorded event to its JSON object.
#[must_use]
pub fn to_value(event: &RecordedEvent) -> Value {
    match *event {
        RecordedEvent::CheckBegin {
            root,
            mode,
            strategy,
        } => json!({
            "event": "check_begin",
            "root": root,
            "mode": mode_name(mode),
            "strategy": strategy_name(strategy),
        }),
        RecordedEvent::CheckEnd {
            root,
            mode,
            summary,
        } => json!({
            "event": "check_end",
            "root": root,
            "mode": mode_name(mode),
            "updated": summary.updated,
            "skipped_detached": summary.skipped_detached,
            "skipped_clean": summary.skipped_clean,
        }),
        RecordedEvent::Violation { node, binding } => json!({
            "event": "violation",
            "node": node,
            "binding": binding,
        }),
        RecordedEvent::NodeVisit { node, depth, mode } => json!({
            "event": "visit",
            "node": node,
            "depth": depth,
            "mode": mode_name(mode),
        }),
        RecordedEvent::NodeSkip { node, reason } => json!({
            "event": "skip",
            "node": node,
            "reason": reason_name(reason),
        }),
    }
}
