//! Attendance tallies per event series and member.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use roster_core::error::Result;
use roster_core::models::{
    AttendanceReport, EventSeries, MemberReport, ScanSummary, SeriesAttendance,
};
use roster_core::settings::DEFAULT_HIDDEN_MARKER;
use tracing::{info, warn};

use crate::reader::{self, EventFile};

// ── AttendanceAggregator ──────────────────────────────────────────────────────

/// Owns the tallies of one scan.
///
/// Every call to [`AttendanceAggregator::scan`] starts from empty tallies, so
/// scanning an unchanged tree twice produces the same report.
#[derive(Debug, Clone)]
pub struct AttendanceAggregator {
    hidden_marker: char,
    /// series name → number of event files.
    events: BTreeMap<String, u32>,
    /// member name → series name → number of files joined.
    members: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Default for AttendanceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceAggregator {
    pub fn new() -> Self {
        Self::with_hidden_marker(DEFAULT_HIDDEN_MARKER)
    }

    /// Aggregator that skips series directories starting with `marker`.
    pub fn with_hidden_marker(marker: char) -> Self {
        Self {
            hidden_marker: marker,
            events: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    pub fn hidden_marker(&self) -> char {
        self.hidden_marker
    }

    /// Drop all tallies.
    pub fn reset(&mut self) {
        self.events.clear();
        self.members.clear();
    }

    /// Rebuild the tallies from the series directories under `root`.
    ///
    /// Unreadable files still count as an event of their series and are
    /// listed in the returned summary.  Only an unreadable `root` aborts the
    /// scan; the tallies are left empty in that case.
    pub fn scan(&mut self, root: &Path) -> Result<ScanSummary> {
        self.reset();
        let mut summary = ScanSummary::default();

        for series in reader::find_series_dirs(root, self.hidden_marker)? {
            let files = match reader::find_event_files(&series.path) {
                Ok(files) => files,
                Err(e) => {
                    warn!("Skipping series {}: {}", series.name, e);
                    continue;
                }
            };

            summary.series_scanned += 1;
            self.scan_files(&series.name, files, &mut summary);
        }

        info!(
            "Scanned {} series, {} files ({} skipped) under {}",
            summary.series_scanned,
            summary.files_scanned,
            summary.files_skipped.len(),
            root.display()
        );

        Ok(summary)
    }

    /// Read `files` as the events of `series`, updating `summary`.
    fn scan_files(&mut self, series: &str, files: Vec<PathBuf>, summary: &mut ScanSummary) {
        for path in files {
            summary.files_scanned += 1;
            match reader::read_event_file(&path) {
                Ok(file) => {
                    summary.malformed_lines += file.malformed_lines;
                    self.record_file(series, &file);
                }
                Err(e) => {
                    warn!("{}", e);
                    self.record_file(series, &EventFile::default());
                    summary.files_skipped.push(path);
                }
            }
        }
    }

    /// Count one event file of `series`.
    ///
    /// `file.joined` is expected to list each member once, which keeps every
    /// attendance count at or below the series' event count.
    pub fn record_file(&mut self, series: &str, file: &EventFile) {
        *self.events.entry(series.to_string()).or_insert(0) += 1;

        for member in &file.joined {
            *self
                .members
                .entry(member.clone())
                .or_default()
                .entry(series.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Number of event files scanned for `series` (0 if unknown).
    pub fn event_count(&self, series: &str) -> u32 {
        self.events.get(series).copied().unwrap_or(0)
    }

    /// Number of files of `series` that `member` joined (0 if none).
    pub fn attendance(&self, member: &str, series: &str) -> u32 {
        self.members
            .get(member)
            .and_then(|m| m.get(series))
            .copied()
            .unwrap_or(0)
    }

    /// Series names in name order, which is also the scan order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Member names, sorted.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Structured report of the current tallies.
    pub fn report(&self) -> AttendanceReport {
        let series = self
            .events
            .iter()
            .map(|(name, &event_count)| EventSeries {
                name: name.clone(),
                event_count,
            })
            .collect();

        let members = self
            .members
            .iter()
            .map(|(name, attended)| MemberReport {
                name: name.clone(),
                series: attended
                    .iter()
                    .filter(|(_, count)| **count > 0)
                    .map(|(series, &count)| {
                        SeriesAttendance::new(series.clone(), count, self.event_count(series))
                    })
                    .collect(),
            })
            .filter(|m| !m.series.is_empty())
            .collect();

        AttendanceReport { series, members }
    }

    /// One fixed-width text line per member, name column `width` wide.
    pub fn format_report(&self, width: usize) -> Vec<String> {
        self.report().lines(width)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
