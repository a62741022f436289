//! Data transfer objects for the log-store wire protocol

pub mod read;
