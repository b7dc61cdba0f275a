//! Roster window state and TUI event loop.
//!
//! [`App`] owns the aggregator, the rendered report lines and the status of
//! the last recalculation.  Recalculating runs the scan synchronously on the
//! event-loop thread and replaces the visible rows.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use roster_core::error::Result;
use roster_core::models::ScanSummary;
use roster_data::aggregator::AttendanceAggregator;
use tracing::{info, warn};

use crate::components::button::{self, Button, RECALCULATE_LABEL};
use crate::report_view::{self, ReportLayout, ReportViewData, StatusKind};
use crate::themes::Theme;

/// Rows moved by PgUp / PgDn when the list height is not known yet.
const DEFAULT_PAGE: usize = 10;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the roster window.
pub struct App {
    pub theme: Theme,
    aggregator: AttendanceAggregator,
    root: PathBuf,
    /// Name column width of the window's report lines.
    width: usize,
    /// Current report rows, one per member.
    pub lines: Vec<String>,
    /// Summary of the last successful scan.
    pub summary: Option<ScanSummary>,
    pub status: String,
    pub status_kind: StatusKind,
    pub last_scan: Option<DateTime<Local>>,
    /// Index of the first visible report row.
    pub scroll: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Draw the button highlighted on the next frame.
    button_flash: bool,
    /// Layout of the last drawn frame, used for mouse hit-testing.
    layout: Option<ReportLayout>,
}

impl App {
    /// Construct the window state.  No scan happens until
    /// [`App::recalculate`] is called.
    pub fn new(
        theme_name: &str,
        aggregator: AttendanceAggregator,
        root: impl Into<PathBuf>,
        width: usize,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            aggregator,
            root: root.into(),
            width,
            lines: Vec::new(),
            summary: None,
            status: String::new(),
            status_kind: StatusKind::Info,
            last_scan: None,
            scroll: 0,
            should_quit: false,
            button_flash: false,
            layout: None,
        }
    }

    /// The aggregator holding the tallies of the last scan.
    pub fn aggregator(&self) -> &AttendanceAggregator {
        &self.aggregator
    }

    /// Give back the aggregator once the window is closed.
    pub fn into_aggregator(self) -> AttendanceAggregator {
        self.aggregator
    }

    // ── Recalculate ───────────────────────────────────────────────────────────

    /// Re-run the scan and refresh the visible rows.
    ///
    /// A failed scan clears the rows and reports the error in the status bar.
    pub fn recalculate(&mut self) {
        if let Err(e) = self.try_recalculate() {
            warn!("Recalculate failed: {}", e);
        }
    }

    /// Same as [`App::recalculate`] but hands the scan error back to the
    /// caller after updating the status bar.
    pub fn try_recalculate(&mut self) -> Result<()> {
        self.last_scan = Some(Local::now());

        let outcome = self.aggregator.scan(&self.root);
        let result = match outcome {
            Ok(summary) => {
                self.lines = self.aggregator.format_report(self.width);
                self.status = status_message(self.lines.len(), &summary);
                self.status_kind = if summary.is_clean() {
                    StatusKind::Info
                } else {
                    StatusKind::Warning
                };
                info!("Recalculated: {}", self.status);
                self.summary = Some(summary);
                Ok(())
            }
            Err(e) => {
                self.lines.clear();
                self.summary = None;
                self.status = e.to_string();
                self.status_kind = StatusKind::Error;
                Err(e)
            }
        };

        self.clamp_scroll();
        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => self.press_button(),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(self.page_size()),
            KeyCode::PageDown => self.scroll_down(self.page_size()),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    /// Apply one mouse event: clicks on the button recalculate, the wheel
    /// scrolls the list.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(area) = self.button_area() {
                    if button::hit(area, mouse.column, mouse.row) {
                        self.press_button();
                    }
                }
            }
            MouseEventKind::ScrollUp => self.scroll_up(1),
            MouseEventKind::ScrollDown => self.scroll_down(1),
            _ => {}
        }
    }

    fn press_button(&mut self) {
        self.button_flash = true;
        self.recalculate();
    }

    fn button_area(&self) -> Option<Rect> {
        let layout = self.layout?;
        let button = Button::new(RECALCULATE_LABEL, "r", false, &self.theme);
        Some(button.hit_area(layout.button))
    }

    // ── Scrolling ─────────────────────────────────────────────────────────────

    fn page_size(&self) -> usize {
        self.layout
            .map(|l| l.visible_rows())
            .filter(|rows| *rows > 0)
            .unwrap_or(DEFAULT_PAGE)
    }

    fn max_scroll(&self) -> usize {
        let visible = self.layout.map(|l| l.visible_rows()).unwrap_or(0);
        self.lines.len().saturating_sub(visible.max(1))
    }

    fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    fn scroll_down(&mut self, rows: usize) {
        self.scroll = (self.scroll + rows).min(self.max_scroll());
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current state into `frame`.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.layout = Some(ReportLayout::new(area));

        let root = self.root.display().to_string();
        let last_scan = self.last_scan.map(|t| t.format("%H:%M:%S").to_string());
        let data = ReportViewData {
            root: &root,
            last_scan: last_scan.as_deref(),
            lines: &self.lines,
            scroll: self.scroll,
            status: &self.status,
            status_kind: self.status_kind,
            button_active: self.button_flash,
        };
        report_view::render_report_view(frame, area, &data, &self.theme);

        self.button_flash = false;
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the window until `q`, `Esc` or `Ctrl+C`.  Returns the aggregator
    /// with the tallies of the last recalculation.
    pub async fn run(mut self) -> io::Result<AttendanceAggregator> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(Event::Mouse(mouse)) => self.handle_mouse(mouse),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        restore_terminal()?;
        terminal.show_cursor()?;

        result.map(|()| self.into_aggregator())
    }
}

/// Leave the alternate screen and raw mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Status bar text for a successful scan.
fn status_message(members: usize, summary: &ScanSummary) -> String {
    let mut msg = format!(
        "{} members · {} series · {} files",
        members, summary.series_scanned, summary.files_scanned
    );
    if !summary.files_skipped.is_empty() {
        msg.push_str(&format!(" · {} unreadable", summary.files_skipped.len()));
    }
    if summary.malformed_lines > 0 {
        msg.push_str(&format!(" · {} malformed lines", summary.malformed_lines));
    }
    msg
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::backend::TestBackend;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_export(dir: &Path, name: &str, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_for(root: &Path) -> App {
        App::new("dark", AttendanceAggregator::new(), root, 20)
    }

    fn draw(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", AttendanceAggregator::new(), ".", 60);
        assert!(app.lines.is_empty());
        assert!(app.summary.is_none());
        assert!(app.last_scan.is_none());
        assert_eq!(app.scroll, 0);
        assert!(!app.should_quit);
    }

    // ── recalculate ───────────────────────────────────────────────────────────

    #[test]
    fn test_recalculate_populates_lines() {
        let root = TempDir::new().unwrap();
        write_export(&root.path().join("weekly"), "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        app.recalculate();

        assert_eq!(app.lines.len(), 1);
        assert!(app.lines[0].starts_with("Sam"));
        assert!(app.lines[0].contains("weekly: 100.0"));
        assert_eq!(app.status_kind, StatusKind::Info);
        assert!(app.status.contains("1 members"));
        assert!(app.last_scan.is_some());
    }

    #[test]
    fn test_recalculate_button_refreshes_rows() {
        let root = TempDir::new().unwrap();
        let weekly = root.path().join("weekly");
        write_export(&weekly, "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        app.recalculate();
        assert_eq!(app.lines.len(), 1);

        write_export(&weekly, "2.csv", "Name\tStatus\nAna\tJoined\n");
        app.handle_key(key(KeyCode::Char('r')));

        assert_eq!(app.lines.len(), 2);
        assert!(app.lines[0].starts_with("Ana"));
        assert!(app.lines[0].contains("weekly: 50.0"));
        assert!(app.lines[1].contains("weekly: 50.0"));
    }

    #[test]
    fn test_recalculate_error_shown_in_status() {
        let mut app = app_for(Path::new("/tmp/does-not-exist-roster-ui-xyz"));
        app.lines = vec!["stale".to_string()];
        assert!(app.try_recalculate().is_err());

        assert!(app.lines.is_empty());
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.contains("Failed to read directory"));
    }

    #[test]
    fn test_recalculate_warns_on_malformed_lines() {
        let root = TempDir::new().unwrap();
        write_export(
            &root.path().join("weekly"),
            "1.csv",
            "Name\tStatus\ngarbage\nSam\tJoined\n",
        );

        let mut app = app_for(root.path());
        app.recalculate();

        assert_eq!(app.status_kind, StatusKind::Warning);
        assert!(app.status.contains("1 malformed lines"));
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            let mut app = app_for(Path::new("."));
            app.handle_key(key(code));
            assert!(app.should_quit);
        }

        let mut app = app_for(Path::new("."));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app_for(Path::new("."));
        app.handle_key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(!app.should_quit);
    }

    #[test]
    fn test_click_on_button_recalculates() {
        let root = TempDir::new().unwrap();
        write_export(&root.path().join("weekly"), "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        draw(&mut app, 80, 20);
        assert!(app.lines.is_empty());

        // The button sits on the first row below the 4-line header.
        app.handle_mouse(click(3, 4));
        assert_eq!(app.lines.len(), 1);
    }

    #[test]
    fn test_click_outside_button_ignored() {
        let root = TempDir::new().unwrap();
        write_export(&root.path().join("weekly"), "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        draw(&mut app, 80, 20);
        app.handle_mouse(click(40, 4));
        app.handle_mouse(click(3, 10));
        assert!(app.lines.is_empty());
    }

    #[test]
    fn test_scrolling_is_clamped() {
        let mut app = app_for(Path::new("."));
        app.lines = (0..30).map(|i| format!("member {i}")).collect();
        // 20 rows: list is 13 high, 11 visible rows.
        draw(&mut app, 80, 20);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.scroll, 0);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.scroll, 1);

        app.handle_key(key(KeyCode::End));
        assert_eq!(app.scroll, 19);

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll, 19);

        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll, 8);

        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.scroll, 0);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_after_recalculate_does_not_panic() {
        let root = TempDir::new().unwrap();
        write_export(&root.path().join("weekly"), "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        app.handle_key(key(KeyCode::Enter));
        draw(&mut app, 100, 24);
        assert!(app.layout.is_some());
    }

    #[test]
    fn test_into_aggregator_keeps_tallies() {
        let root = TempDir::new().unwrap();
        write_export(&root.path().join("weekly"), "1.csv", "Name\tStatus\nSam\tJoined\n");

        let mut app = app_for(root.path());
        app.recalculate();
        let agg = app.into_aggregator();
        assert_eq!(agg.attendance("Sam", "weekly"), 1);
    }

    // ── status_message ────────────────────────────────────────────────────────

    #[test]
    fn test_status_message_mentions_skips() {
        let summary = ScanSummary {
            series_scanned: 2,
            files_scanned: 5,
            files_skipped: vec![PathBuf::from("a")],
            malformed_lines: 3,
        };
        let msg = status_message(4, &summary);
        assert_eq!(
            msg,
            "4 members · 2 series · 5 files · 1 unreadable · 3 malformed lines"
        );
    }
}
