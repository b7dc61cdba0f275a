mod bootstrap;

use anyhow::Result;
use roster_core::models::AttendanceReport;
use roster_core::settings::Settings;
use roster_data::aggregator::AttendanceAggregator;
use roster_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::setup_logging(
        &settings.log_level,
        settings.log_file.as_deref(),
        settings.tui,
    )?;

    tracing::info!("Active Roster v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Root: {}, Hidden marker: {:?}, Theme: {}",
        settings.root.display(),
        settings.hidden_marker,
        settings.theme
    );

    let mut aggregator = AttendanceAggregator::with_hidden_marker(settings.hidden_marker);

    if settings.tui {
        let mut app = App::new(
            &settings.theme,
            aggregator,
            settings.root.clone(),
            settings.ui_width,
        );
        // An unreadable root is fatal before the window opens.
        app.try_recalculate()?;

        aggregator = app.run().await?;
    } else {
        let summary = aggregator.scan(&settings.root)?;
        tracing::info!(
            "Scanned {} series, {} files",
            summary.series_scanned,
            summary.files_scanned
        );
    }

    let report = aggregator.report();
    print!("{}", render_console(&report, &settings)?);

    Ok(())
}

/// Console output for `report` in the configured format.
fn render_console(report: &AttendanceReport, settings: &Settings) -> Result<String> {
    if settings.json_output() {
        let mut out = serde_json::to_string_pretty(report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for line in report.lines(settings.width) {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> Settings {
        let mut argv: Vec<OsString> = vec!["active-roster".into()];
        argv.extend(args.iter().map(OsString::from));
        Settings::load_from_args(argv)
    }

    fn sample_report() -> (TempDir, AttendanceReport) {
        let tmp = TempDir::new().expect("tempdir");
        let weekly = tmp.path().join("weekly");
        std::fs::create_dir_all(&weekly).unwrap();
        std::fs::write(weekly.join("1.csv"), "Name\tStatus\nSam\tJoined\nAna\tLeft\n").unwrap();
        std::fs::write(weekly.join("2.csv"), "Name\tStatus\nSam\tJoined\nAna\tJoined\n").unwrap();

        let mut agg = AttendanceAggregator::new();
        agg.scan(tmp.path()).unwrap();
        (tmp, agg.report())
    }

    #[test]
    fn test_render_console_text() {
        let (_tmp, report) = sample_report();
        let out = render_console(&report, &settings(&["--width", "10"])).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Ana       |\tweekly: 50.0  %");
        assert_eq!(lines[1], "Sam       |\tweekly: 100.0 %");
    }

    #[test]
    fn test_render_console_default_width() {
        let (_tmp, report) = sample_report();
        let out = render_console(&report, &settings(&[])).unwrap();
        let first = out.lines().next().unwrap();
        assert_eq!(first.find('|'), Some(40));
    }

    #[test]
    fn test_render_console_json() {
        let (_tmp, report) = sample_report();
        let out = render_console(&report, &settings(&["--format", "json"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["members"][1]["name"], "Sam");
        assert_eq!(value["members"][1]["series"][0]["attended"], 2);
    }

    #[test]
    fn test_render_console_empty_report() {
        let report = AttendanceReport::default();
        let out = render_console(&report, &settings(&[])).unwrap();
        assert!(out.is_empty());
    }
}
