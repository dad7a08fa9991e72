//! Singer message output.
//!
//! The pipeline protocol is newline-delimited JSON on stdout: SCHEMA
//! messages describe each stream, RECORD messages carry the data, and a
//! STATE message carries the checkpoint. The writer takes any `io::Write`
//! sink so tests can capture output; logs never go through it.

use std::io::Write;

use serde_json::{json, Value};

use crate::asana::Record;
use crate::config::State;
use crate::error::{Result, TapError};

/// Writes Singer messages to a sink, one JSON object per line.
///
/// Each message is flushed immediately so per-project batches become
/// visible to the downstream consumer as they complete.
pub struct SingerWriter<W: Write> {
    out: W,
}

impl<W: Write> SingerWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write a SCHEMA message declaring a stream and its key property.
    pub fn write_schema(&mut self, stream: &str, schema: &Value, key_property: &str) -> Result<()> {
        self.write_message(&json!({
            "type": "SCHEMA",
            "stream": stream,
            "schema": schema,
            "key_properties": [key_property],
        }))
    }

    /// Write one RECORD message per record, preserving order.
    pub fn write_records(&mut self, stream: &str, records: &[Record]) -> Result<()> {
        for record in records {
            self.write_message(&json!({
                "type": "RECORD",
                "stream": stream,
                "record": record,
            }))?;
        }
        Ok(())
    }

    /// Write the STATE message carrying the checkpoint.
    pub fn write_state(&mut self, state: &State) -> Result<()> {
        self.write_message(&json!({
            "type": "STATE",
            "value": state,
        }))
    }

    fn write_message(&mut self, message: &Value) -> Result<()> {
        let line = serde_json::to_string(message)
            .map_err(|e| TapError::InvalidJson(format!("serializing message: {}", e)))?;
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Monotonic record counter for observability. Never drives control flow;
/// the total is logged as a METRIC line when the counter is dropped.
pub struct RecordCounter {
    stream: String,
    value: u64,
}

impl RecordCounter {
    pub fn new(stream: &str) -> Self {
        Self {
            stream: stream.to_string(),
            value: 0,
        }
    }

    pub fn increment(&mut self) {
        self.value += 1;
    }

    #[cfg(test)]
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl Drop for RecordCounter {
    fn drop(&mut self) {
        let point = json!({
            "type": "counter",
            "metric": "record_count",
            "value": self.value,
            "tags": {"stream": self.stream},
        });
        tracing::info!("METRIC: {}", point);
    }
}
