//! Report data types shared by the aggregator, the console output and the
//! terminal window.

use std::path::PathBuf;

use serde::Serialize;

use crate::formatting::{format_member_line, percentage};

/// Decimal places kept for attendance percentages.
pub const PERCENT_DECIMALS: u32 = 1;

// ── EventSeries ───────────────────────────────────────────────────────────────

/// One recurring event category (a scanned subdirectory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSeries {
    /// Directory name of the series.
    pub name: String,
    /// Number of event files scanned in the series.
    pub event_count: u32,
}

// ── SeriesAttendance ──────────────────────────────────────────────────────────

/// A member's attendance in a single series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesAttendance {
    pub series: String,
    /// Number of event files in which the member joined.
    pub attended: u32,
    /// Number of event files in the series.
    pub events: u32,
    /// `100 * attended / events`, rounded to [`PERCENT_DECIMALS`].
    pub percentage: f64,
}

impl SeriesAttendance {
    pub fn new(series: impl Into<String>, attended: u32, events: u32) -> Self {
        Self {
            series: series.into(),
            attended,
            events,
            percentage: percentage(attended as f64, events as f64, PERCENT_DECIMALS),
        }
    }
}

// ── MemberReport ──────────────────────────────────────────────────────────────

/// Every series a member attended at least once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberReport {
    pub name: String,
    pub series: Vec<SeriesAttendance>,
}

impl MemberReport {
    /// Look up the attendance for `series`, if the member attended it.
    pub fn series(&self, series: &str) -> Option<&SeriesAttendance> {
        self.series.iter().find(|s| s.series == series)
    }
}

// ── AttendanceReport ──────────────────────────────────────────────────────────

/// The complete result of one scan, members sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub series: Vec<EventSeries>,
    pub members: Vec<MemberReport>,
}

impl AttendanceReport {
    /// Fixed-width text lines, one per member.
    pub fn lines(&self, width: usize) -> Vec<String> {
        self.members
            .iter()
            .map(|m| format_member_line(m, width))
            .collect()
    }

    pub fn member(&self, name: &str) -> Option<&MemberReport> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ── ScanSummary ───────────────────────────────────────────────────────────────

/// Bookkeeping for one scan: what was read and what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub series_scanned: usize,
    pub files_scanned: usize,
    /// Files that were counted as events but could not be read.
    pub files_skipped: Vec<PathBuf>,
    /// Record lines that lacked a status column.
    pub malformed_lines: usize,
}

impl ScanSummary {
    /// `true` when every file and line was read cleanly.
    pub fn is_clean(&self) -> bool {
        self.files_skipped.is_empty() && self.malformed_lines == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AttendanceReport {
        AttendanceReport {
            series: vec![
                EventSeries {
                    name: "monthly".to_string(),
                    event_count: 3,
                },
                EventSeries {
                    name: "weekly".to_string(),
                    event_count: 2,
                },
            ],
            members: vec![
                MemberReport {
                    name: "Ana".to_string(),
                    series: vec![SeriesAttendance::new("monthly", 2, 3)],
                },
                MemberReport {
                    name: "Sam".to_string(),
                    series: vec![
                        SeriesAttendance::new("monthly", 1, 3),
                        SeriesAttendance::new("weekly", 2, 2),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_series_attendance_percentage_rounded() {
        let cell = SeriesAttendance::new("weekly", 1, 3);
        assert_eq!(cell.attended, 1);
        assert_eq!(cell.events, 3);
        assert!((cell.percentage - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_series_attendance_zero_events() {
        let cell = SeriesAttendance::new("empty", 0, 0);
        assert_eq!(cell.percentage, 0.0);
    }

    #[test]
    fn test_report_lines_one_per_member() {
        let report = sample_report();
        let lines = report.lines(40);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Ana"));
        assert!(lines[0].contains("monthly: 66.7"));
        assert!(lines[1].starts_with("Sam"));
        assert!(lines[1].contains("monthly: 33.3"));
        assert!(lines[1].contains("weekly: 100.0"));
    }

    #[test]
    fn test_report_member_lookup() {
        let report = sample_report();
        let sam = report.member("Sam").unwrap();
        assert_eq!(sam.series("weekly").unwrap().attended, 2);
        assert!(sam.series("daily").is_none());
        assert!(report.member("Bob").is_none());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = sample_report();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["members"][1]["name"], "Sam");
        assert_eq!(value["members"][1]["series"][1]["series"], "weekly");
        assert_eq!(value["members"][1]["series"][1]["percentage"], 100.0);
        assert_eq!(value["series"][0]["event_count"], 3);
    }

    #[test]
    fn test_empty_report() {
        let report = AttendanceReport::default();
        assert!(report.is_empty());
        assert!(report.lines(40).is_empty());
    }

    #[test]
    fn test_scan_summary_clean() {
        let mut summary = ScanSummary::default();
        assert!(summary.is_clean());
        summary.malformed_lines = 1;
        assert!(!summary.is_clean());
    }
}
