use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, RosterError};

/// Leading character that marks a series directory as hidden.
pub const DEFAULT_HIDDEN_MARKER: char = '.';

/// Name column width of the console report.
pub const DEFAULT_CONSOLE_WIDTH: usize = 40;

/// Name column width of the terminal window report.
pub const DEFAULT_UI_WIDTH: usize = 60;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Attendance percentages per member from event export folders
#[derive(Parser, Debug, Clone)]
#[command(
    name = "active-roster",
    about = "Attendance percentages per member from event export folders",
    version
)]
pub struct Settings {
    /// Directory whose subdirectories are the event series
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Width of the member name column in console output
    #[arg(long, default_value_t = DEFAULT_CONSOLE_WIDTH)]
    pub width: usize,

    /// Open the interactive window before printing the report
    #[arg(long)]
    pub tui: bool,

    /// Width of the member name column in the window
    #[arg(long, default_value_t = DEFAULT_UI_WIDTH)]
    pub ui_width: usize,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Series directories starting with this character are skipped
    #[arg(long, default_value_t = DEFAULT_HIDDEN_MARKER)]
    pub hidden_marker: char,

    /// Console output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        let mut settings = Settings::parse_from(args);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// Reject values that parse but cannot produce a usable report.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(RosterError::Config("--width must be at least 1".to_string()));
        }
        if self.ui_width == 0 {
            return Err(RosterError::Config(
                "--ui-width must be at least 1".to_string(),
            ));
        }
        if self.hidden_marker.is_whitespace() {
            return Err(RosterError::Config(format!(
                "--hidden-marker must be a visible character, got {:?}",
                self.hidden_marker
            )));
        }
        Ok(())
    }

    /// `true` when the console report should be JSON instead of text.
    pub fn json_output(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
