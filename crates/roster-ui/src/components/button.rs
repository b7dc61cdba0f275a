use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Label of the button that re-runs the scan.
pub const RECALCULATE_LABEL: &str = "Recalculate";

/// A single-line push button followed by its keyboard hint.
pub struct Button<'a> {
    pub label: &'a str,
    /// Key hint rendered after the button, e.g. `"r"`.
    pub hint: &'a str,
    /// Render with the activated style.
    pub active: bool,
    pub theme: &'a Theme,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str, hint: &'a str, active: bool, theme: &'a Theme) -> Self {
        Self {
            label,
            hint,
            active,
            theme,
        }
    }

    /// The clickable face, `"[ label ]"`.
    pub fn face(&self) -> String {
        format!("[ {} ]", self.label)
    }

    /// Display width of [`Button::face`] in terminal columns.
    pub fn width(&self) -> u16 {
        u16::try_from(self.face().width()).unwrap_or(u16::MAX)
    }

    /// Area covered by the face when the button is drawn at the top-left
    /// corner of `area`.
    pub fn hit_area(&self, area: Rect) -> Rect {
        Rect {
            x: area.x,
            y: area.y,
            width: self.width().min(area.width),
            height: area.height.min(1),
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let style = if self.active {
            self.theme.button_active
        } else {
            self.theme.button
        };
        Line::from(vec![
            Span::styled(self.face(), style),
            Span::styled(format!("  press {} ", self.hint), self.theme.dim),
        ])
    }
}

/// `true` when the cell at (`column`, `row`) lies inside `area`.
pub fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && row >= area.y
        && u32::from(column) < u32::from(area.x) + u32::from(area.width)
        && u32::from(row) < u32::from(area.y) + u32::from(area.height)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
