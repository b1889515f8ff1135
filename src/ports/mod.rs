//! Port traits at the I/O seams of the aggregation engine.

pub mod catalog_port;
pub mod config_port;
pub mod record_source;
pub mod report_port;
