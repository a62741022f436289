//! Read endpoint DTOs
//!
//! Query parameters and JSON response of `GET /api/v1/read/{source_id}`.
//! The response follows protobuf JSON conventions: int64 fields may arrive
//! as strings, bytes are base64, and default values are omitted.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::envelope::{EnvelopeType, LogEnvelope, MessageType};

/// Tag key carrying the emitting component's type
pub const SOURCE_TYPE_TAG: &str = "source_type";

/// Errors raised while turning wire envelopes into domain envelopes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid envelope timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid log payload encoding: {0}")]
    InvalidPayload(String),
}

/// Parameters of a single read against the log store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadQuery {
    /// Lower time bound in nanoseconds, `0` means unbounded
    pub start_time: i64,
    pub envelope_types: Vec<EnvelopeType>,
    pub limit: usize,
    /// Newest envelopes first
    pub descending: bool,
}

impl ReadQuery {
    /// The most recent `limit` log envelopes, newest first
    pub fn recent_logs(limit: usize) -> Self {
        Self {
            start_time: 0,
            envelope_types: vec![EnvelopeType::Log],
            limit,
            descending: true,
        }
    }

    /// URL query pairs in the order the endpoint documents them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("start_time", self.start_time.to_string())];
        for envelope_type in &self.envelope_types {
            pairs.push(("envelope_types", envelope_type.as_str().to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        if self.descending {
            pairs.push(("descending", "true".to_string()));
        }
        pairs
    }
}

/// Top-level read response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadResponse {
    #[serde(default)]
    pub envelopes: Option<EnvelopeBatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeBatch {
    #[serde(default)]
    pub batch: Vec<WireEnvelope>,
}

/// protobuf JSON int64: a decimal string or a bare number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireInt64 {
    Number(i64),
    Text(String),
}

impl WireInt64 {
    pub fn value(&self) -> Result<i64, DecodeError> {
        match self {
            WireInt64::Number(n) => Ok(*n),
            WireInt64::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| DecodeError::InvalidTimestamp(s.clone())),
        }
    }
}

/// One envelope as it appears on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(default)]
    pub timestamp: Option<WireInt64>,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub log: Option<WireLog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireLog {
    /// Base64-encoded message bytes
    #[serde(default)]
    pub payload: String,
    #[serde(default, rename = "type")]
    pub message_type: Option<String>,
}

impl WireEnvelope {
    /// Convert to a domain envelope
    ///
    /// Returns `Ok(None)` for envelopes that carry no log section.
    pub fn into_envelope(self) -> Result<Option<LogEnvelope>, DecodeError> {
        let Some(log) = self.log else {
            return Ok(None);
        };

        let timestamp = match &self.timestamp {
            Some(ts) => ts.value()?,
            None => 0,
        };

        let payload = decode_payload(&log.payload)?;
        let source_type = self
            .tags
            .get(SOURCE_TYPE_TAG)
            .cloned()
            .unwrap_or_default();

        Ok(Some(LogEnvelope {
            timestamp,
            message_type: MessageType::from_wire(log.message_type.as_deref()),
            source_type,
            source_instance: self.instance_id,
            payload,
        }))
    }
}

impl ReadResponse {
    /// Decode every log envelope, preserving the store's ordering
    pub fn into_envelopes(self) -> Result<Vec<LogEnvelope>, DecodeError> {
        let batch = self.envelopes.map(|e| e.batch).unwrap_or_default();
        let mut envelopes = Vec::with_capacity(batch.len());
        for wire in batch {
            if let Some(envelope) = wire.into_envelope()? {
                envelopes.push(envelope);
            }
        }
        Ok(envelopes)
    }
}

fn decode_payload(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(encoded)
        .or_else(|_| URL_SAFE.decode(encoded))
        .map_err(|e| DecodeError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "envelopes": {
            "batch": [
                {
                    "timestamp": "1700000002000000000",
                    "source_id": "app-guid",
                    "instance_id": "1",
                    "tags": {"source_type": "APP/PROC/WEB"},
                    "log": {"payload": "c2Vjb25k", "type": "ERR"}
                },
                {
                    "timestamp": 1700000001000000000,
                    "source_id": "app-guid",
                    "instance_id": "0",
                    "tags": {"source_type": "RTR"},
                    "log": {"payload": "Zmlyc3Q="}
                },
                {
                    "timestamp": "1700000000500000000",
                    "source_id": "app-guid",
                    "counter": {"name": "requests", "total": "3"}
                }
            ]
        }
    }"#;

    #[test]
    fn test_recent_logs_query() {
        let query = ReadQuery::recent_logs(25);
        assert_eq!(query.start_time, 0);
        assert_eq!(query.envelope_types, vec![EnvelopeType::Log]);
        assert_eq!(query.limit, 25);
        assert!(query.descending);
    }

    #[test]
    fn test_query_pairs() {
        let pairs = ReadQuery::recent_logs(10).to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("start_time", "0".to_string()),
                ("envelope_types", "LOG".to_string()),
                ("limit", "10".to_string()),
                ("descending", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_ascending_omits_flag() {
        let query = ReadQuery {
            descending: false,
            ..ReadQuery::recent_logs(5)
        };
        assert!(query.to_query_pairs().iter().all(|(k, _)| *k != "descending"));
    }

    #[test]
    fn test_response_decodes_log_envelopes_in_order() {
        let response: ReadResponse = serde_json::from_str(SAMPLE).unwrap();
        let envelopes = response.into_envelopes().unwrap();

        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].timestamp, 1_700_000_002_000_000_000);
        assert_eq!(envelopes[0].message_type, MessageType::Err);
        assert_eq!(envelopes[0].source_type, "APP/PROC/WEB");
        assert_eq!(envelopes[0].source_instance, "1");
        assert_eq!(envelopes[0].payload, b"second");

        assert_eq!(envelopes[1].message_type, MessageType::Out);
        assert_eq!(envelopes[1].source_type, "RTR");
        assert_eq!(envelopes[1].payload, b"first");
    }

    #[test]
    fn test_empty_response() {
        let response: ReadResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_envelopes().unwrap().is_empty());

        let response: ReadResponse = serde_json::from_str(r#"{"envelopes":{}}"#).unwrap();
        assert!(response.into_envelopes().unwrap().is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let wire = WireEnvelope {
            timestamp: Some(WireInt64::Text("soon".to_string())),
            log: Some(WireLog::default()),
            ..Default::default()
        };
        assert_eq!(
            wire.into_envelope(),
            Err(DecodeError::InvalidTimestamp("soon".to_string()))
        );
    }

    #[test]
    fn test_bad_payload_is_rejected() {
        let wire = WireEnvelope {
            log: Some(WireLog {
                payload: "!!not base64!!".to_string(),
                message_type: None,
            }),
            ..Default::default()
        };
        assert!(matches!(
            wire.into_envelope(),
            Err(DecodeError::InvalidPayload(_))
        ));
    }
}
