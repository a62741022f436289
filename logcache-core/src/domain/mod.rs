//! Domain types

pub mod envelope;
