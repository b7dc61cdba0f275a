//! Shared building blocks for Active Roster.
//!
//! Holds the error taxonomy, command-line settings, report models and the
//! fixed-width text formatting used by both the console and the window.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
