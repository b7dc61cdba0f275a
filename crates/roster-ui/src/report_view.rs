//! Report window layout for the roster TUI.
//!
//! Four stacked regions: header, the Recalculate button, a bordered list of
//! report lines and a one-line status bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::components::button::{Button, RECALCULATE_LABEL};
use crate::components::header::Header;
use crate::themes::Theme;

/// Column interval used when expanding tabs in report lines.
pub const TAB_WIDTH: usize = 8;

/// Severity of the status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// Everything the report window shows for one frame.
pub struct ReportViewData<'a> {
    pub root: &'a str,
    pub last_scan: Option<&'a str>,
    pub lines: &'a [String],
    /// Index of the first visible report line.
    pub scroll: usize,
    pub status: &'a str,
    pub status_kind: StatusKind,
    /// Draw the button in its activated style.
    pub button_active: bool,
}

/// Screen regions of the report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    pub header: Rect,
    pub button: Rect,
    pub list: Rect,
    pub status: Rect,
}

impl ReportLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            button: chunks[1],
            list: chunks[2],
            status: chunks[3],
        }
    }

    /// Number of report lines visible inside the bordered list.
    pub fn visible_rows(&self) -> usize {
        usize::from(self.list.height.saturating_sub(2))
    }
}

/// Replace tabs with spaces up to the next multiple of `tab_width` columns.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(line.len());
    let mut column = 0usize;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += c.width().unwrap_or(0);
        }
    }
    out
}

/// Render the full report window into `area`.
pub fn render_report_view(frame: &mut Frame, area: Rect, data: &ReportViewData, theme: &Theme) {
    let layout = ReportLayout::new(area);

    let header = Header::new(data.root, data.last_scan, theme).to_lines();
    frame.render_widget(Paragraph::new(Text::from(header)), layout.header);

    let button = Button::new(RECALCULATE_LABEL, "r", data.button_active, theme).to_line();
    frame.render_widget(Paragraph::new(button), layout.button);

    if data.lines.is_empty() {
        render_no_members(frame, layout.list, theme);
    } else {
        render_report_list(frame, layout.list, data, theme);
    }

    let status_style = match data.status_kind {
        StatusKind::Info => theme.info,
        StatusKind::Warning => theme.warning,
        StatusKind::Error => theme.error,
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(data.status, status_style),
            Span::styled("   ↑/↓ scroll · q quit", theme.dim),
        ])),
        layout.status,
    );
}

fn render_report_list(frame: &mut Frame, area: Rect, data: &ReportViewData, theme: &Theme) {
    let rows: Vec<Line> = data
        .lines
        .iter()
        .enumerate()
        .skip(data.scroll)
        .map(|(i, line)| Line::from(Span::styled(expand_tabs(line, TAB_WIDTH), theme.row_style(i))))
        .collect();

    let title = format!(" Members ({}) ", data.lines.len());
    frame.render_widget(
        Paragraph::new(Text::from(rows)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.list_border)
                .title(title),
        ),
        area,
    );
}

/// Placeholder shown when no member has any attendance.
pub fn render_no_members(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No attendance found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Each subdirectory of the root is one event series of exports.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'r' to recalculate", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.list_border)
                .title(" Members "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
