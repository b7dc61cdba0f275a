use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the window title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Window title shown in the header.
pub const TITLE: &str = "ACTIVE ROSTER";

/// Width of the `=` separator under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Roster window header rendering four lines:
///
/// 1. Application title with accent decorations.
/// 2. A 60-column `=` separator.
/// 3. Scan root and last recalculation time in `[ root | time ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Directory whose subdirectories are scanned.
    pub root: &'a str,
    /// Formatted time of the last recalculation, `None` before the first one.
    pub last_scan: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(root: &'a str, last_scan: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            root,
            last_scan,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let scanned = match self.last_scan {
            Some(time) => format!("recalculated {}", time),
            None => "not calculated".to_string(),
        };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.root, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(scanned, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
