//! Terminal UI layer for Active Roster.
//!
//! Provides themes, the header and Recalculate button components, the report
//! list view and the application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod report_view;
pub mod themes;

pub use roster_core as core;
