// src/logging.rs
//
// Telemetry sinks for the reward kernel.
// - RewardSink: trait the aggregator reports through
// - NoopSink:   discards everything
// - MemorySink: records emissions/notices in memory (tests, replay checks)
// - FileSink:   writes one JSON line per event for backtesting / RL

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::json;

/// Host-side hook for emissions and diagnostics.
pub trait RewardSink {
    /// Called strictly after the aggregator has written its output scalar.
    /// This is where a host mirrors the value to device-visible memory;
    /// the ordering is always write-then-sync.
    fn on_emit(&mut self, tick: u64, value: f32);

    /// Advisory diagnostic (the unset-variant path). Never affects
    /// aggregator state.
    fn notice(&mut self, tick: u64, msg: &str);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl RewardSink for NoopSink {
    fn on_emit(&mut self, _tick: u64, _value: f32) {
        // intentionally no-op
    }

    fn notice(&mut self, _tick: u64, _msg: &str) {
        // intentionally no-op
    }
}

/// Sink that records everything in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemorySink {
    pub emissions: Vec<(u64, f32)>,
    pub notices: Vec<(u64, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardSink for MemorySink {
    fn on_emit(&mut self, tick: u64, value: f32) {
        self.emissions.push((tick, value));
    }

    fn notice(&mut self, tick: u64, msg: &str) {
        self.notices.push((tick, msg.to_string()));
    }
}

/// JSONL file sink.
///
/// Each emission (or notice) is written as a single JSON object on its own
/// line, flushed immediately so a crashed run still leaves usable telemetry.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, value: &serde_json::Value) {
        // If logging fails we don't want to crash the simulation,
        // so I/O errors are deliberately ignored.
        if let Ok(line) = serde_json::to_string(value) {
            let _ = self.writer.write_all(line.as_bytes());
            let _ = self.writer.write_all(b"\n");
            let _ = self.writer.flush();
        }
    }
}

impl RewardSink for FileSink {
    fn on_emit(&mut self, tick: u64, value: f32) {
        self.write_line(&json!({ "tick": tick, "reward": value }));
    }

    fn notice(&mut self, tick: u64, msg: &str) {
        self.write_line(&json!({ "tick": tick, "notice": msg }));
    }
}
