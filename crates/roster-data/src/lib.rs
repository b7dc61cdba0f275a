//! Data layer for Active Roster.
//!
//! Discovers event series directories, decodes and parses attendance
//! exports, and accumulates per-member attendance tallies into reports.

pub mod aggregator;
pub mod reader;

pub use roster_core as core;
