//! Log envelope domain types

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log record as returned by the log store
///
/// Envelopes are read-only: the adapter decodes them from the wire and
/// renders them, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEnvelope {
    /// Nanoseconds since the Unix epoch
    pub timestamp: i64,
    pub message_type: MessageType,
    /// Emitting component, e.g. `APP/PROC/WEB`
    pub source_type: String,
    /// Instance index of the emitting component
    pub source_instance: String,
    /// Raw message bytes, may span several lines
    pub payload: Vec<u8>,
}

impl LogEnvelope {
    /// Timestamp as a UTC instant
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp)
    }

    /// Payload decoded as UTF-8, replacing invalid sequences
    pub fn payload_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    pub fn is_stdout(&self) -> bool {
        self.message_type == MessageType::Out
    }
}

/// Stream a log message was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageType {
    #[default]
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "ERR")]
    Err,
}

impl MessageType {
    /// Three-letter tag used in rendered headers
    pub fn tag(&self) -> &'static str {
        match self {
            MessageType::Out => "OUT",
            MessageType::Err => "ERR",
        }
    }

    /// Decode the wire value; only a literal `ERR` selects the error stream
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("ERR") => MessageType::Err,
            _ => MessageType::Out,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Envelope kinds held by the log store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeType {
    Log,
    Counter,
    Gauge,
    Timer,
    Event,
}

impl EnvelopeType {
    /// Query-string value understood by the read endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeType::Log => "LOG",
            EnvelopeType::Counter => "COUNTER",
            EnvelopeType::Gauge => "GAUGE",
            EnvelopeType::Timer => "TIMER",
            EnvelopeType::Event => "EVENT",
        }
    }
}

impl fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelopes as returned by a single read, newest first
pub type RetrievedBatch = Vec<LogEnvelope>;
