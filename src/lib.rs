//! decastat: decade-bucketed market statistics over daily price files.
//!
//! Hexagonal architecture: aggregation logic in [`domain`], port traits in
//! [`ports`], concrete file/config/report implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
