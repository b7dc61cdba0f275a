use crate::models::{MemberReport, SeriesAttendance};

/// Column separator written after the padded member name.
pub const NAME_SEPARATOR: char = '|';

/// Fixed width of the percentage column (before the `%` sign).
pub const PERCENT_WIDTH: usize = 6;

/// Marker appended to truncated strings.
const ELLIPSIS: &str = "...";

/// Pad `s` with trailing spaces to `width` characters, or truncate it.
///
/// A string is only padded when it is strictly shorter than `width`.  Any
/// other string keeps its first `width - 3` characters followed by `...`, so
/// a string of exactly `width` characters is truncated too.  For widths below
/// three the prefix is empty and the result is just `...`.
///
/// # Examples
///
/// ```
/// use roster_core::formatting::pad_or_truncate;
///
/// assert_eq!(pad_or_truncate("Sam", 6), "Sam   ");
/// assert_eq!(pad_or_truncate("Samantha", 6), "Sam...");
/// assert_eq!(pad_or_truncate("Sam", 2), "...");
/// ```
pub fn pad_or_truncate(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len < width {
        let mut out = String::with_capacity(s.len() + (width - len));
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - len));
        out
    } else {
        let keep = width.saturating_sub(ELLIPSIS.len());
        let mut out: String = s.chars().take(keep).collect();
        out.push_str(ELLIPSIS);
        out
    }
}

/// Calculate `100 / whole * part`, rounded to `decimal_places`.
///
/// Rounding works on the exact binary value and breaks ties to the even
/// digit, so `1/16` (6.25) gives `6.2`.  Returns `0.0` if `whole` is zero to
/// avoid division by zero.
///
/// # Examples
///
/// ```
/// use roster_core::formatting::percentage;
///
/// assert!((percentage(2.0, 3.0, 1) - 66.7).abs() < 1e-9);
/// assert_eq!(percentage(1.0, 16.0, 1), 6.2);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = 100.0 / whole * part;
    // Fixed-precision formatting is correctly rounded, ties to even.
    format!("{:.*}", decimal_places as usize, raw)
        .parse()
        .unwrap_or(raw)
}

/// Render an already-rounded percentage with exactly one decimal digit.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}", value)
}

/// One `\t{series}: {pct}%` cell of a report line.
pub fn format_series_cell(cell: &SeriesAttendance) -> String {
    format!(
        "\t{}: {}%",
        cell.series,
        pad_or_truncate(&format_percentage(cell.percentage), PERCENT_WIDTH)
    )
}

/// Format one member's report line with the name column `width` wide.
///
/// Layout: `<name padded to width>|` followed by one
/// [`format_series_cell`] per attended series.
pub fn format_member_line(member: &MemberReport, width: usize) -> String {
    let mut line = pad_or_truncate(&member.name, width);
    line.push(NAME_SEPARATOR);
    for cell in &member.series {
        line.push_str(&format_series_cell(cell));
    }
    line
}

// ── Tests ──────────────────────────────────────────────────────────────────────
