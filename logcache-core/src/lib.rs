//! Log Cache Core
//!
//! Core types and rendering for the Log Cache recent-logs adapter.
//!
//! This crate contains:
//! - Domain types: log envelopes as produced by the log store
//! - DTOs: the wire shape of the log-store read endpoint
//! - Rendering: the fixed text format for recent logs

pub mod domain;
pub mod dto;
pub mod render;
