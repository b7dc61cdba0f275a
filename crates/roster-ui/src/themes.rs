use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned as the safe
/// default.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .map(|val| background_from_colorfgbg(&val))
        .filter(|bg| *bg != BackgroundType::Unknown)
        .unwrap_or(BackgroundType::Dark)
}

/// Classify a raw `COLORFGBG` value.
pub fn background_from_colorfgbg(value: &str) -> BackgroundType {
    match value.split(';').next_back().map(str::parse::<u8>) {
        Some(Ok(bg)) if bg <= 6 => BackgroundType::Dark,
        Some(Ok(_)) => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Styles used by the roster window.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Button ───────────────────────────────────────────────────────────────
    pub button: Style,
    /// Button style for the frame right after it was activated.
    pub button_active: Style,

    // ── Report list ──────────────────────────────────────────────────────────
    pub list_row: Style,
    pub list_row_alt: Style,
    pub list_border: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            button: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            button_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            list_row: Style::default().fg(Color::White),
            list_row_alt: Style::default().fg(Color::Gray),
            list_border: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            button: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            button_active: Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            list_row: Style::default().fg(Color::Black),
            list_row_alt: Style::default().fg(Color::DarkGray),
            list_border: Style::default().fg(Color::Gray),
        }
    }

    /// Plain theme without bold modifiers or background fills.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default(),

            dim: Style::default().fg(Color::DarkGray),
            label: Style::default(),
            value: Style::default(),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            button: Style::default().add_modifier(Modifier::REVERSED),
            button_active: Style::default().fg(Color::Yellow),

            list_row: Style::default(),
            list_row_alt: Style::default(),
            list_border: Style::default(),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Alternating style for report row `index`.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.list_row
        } else {
            self.list_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_dark_values() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("7;6"), BackgroundType::Dark);
    }

    #[test]
    fn test_background_light_values() {
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;default;7"), BackgroundType::Light);
    }

    #[test]
    fn test_background_unparseable() {
        assert_eq!(background_from_colorfgbg(""), BackgroundType::Unknown);
        assert_eq!(background_from_colorfgbg("0;default"), BackgroundType::Unknown);
    }

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.button.bg, Some(Color::Cyan));
        assert_eq!(t.list_row.fg, Some(Color::White));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.list_row.fg, Some(Color::Black));
        assert_eq!(t.button.bg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.error.add_modifier.contains(Modifier::BOLD));
        assert!(t.button.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_from_name_known() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(Theme::from_name("classic").button_active.bg.is_none());
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0), t.list_row);
        assert_eq!(t.row_style(1), t.list_row_alt);
        assert_eq!(t.row_style(2), t.list_row);
    }
}
