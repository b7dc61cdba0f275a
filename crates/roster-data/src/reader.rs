//! Event export discovery and loading.
//!
//! A scan root holds one subdirectory per event series; every regular file
//! in a series directory is one tab-separated attendance export.  Exports
//! usually come out of meeting tools as UTF-16, with or without a BOM, so the
//! bytes are decoded before the text is handed to a tab-delimited `csv`
//! reader.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use roster_core::error::{Result, RosterError};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Status value (column 1) that marks a member as present.
pub const JOINED_STATUS: &str = "Joined";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Builds one UTF-16 code unit from two bytes in a fixed byte order.
type UnitReader = fn([u8; 2]) -> u16;

// ── Types ─────────────────────────────────────────────────────────────────────

/// A series directory found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesDir {
    /// Directory name, used as the series identifier.
    pub name: String,
    pub path: PathBuf,
}

/// Classification of one record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord<'a> {
    /// A named member with a `Joined` status.
    Joined(&'a str),
    /// A well-formed line that does not count as attendance.
    NotJoined,
    /// A non-blank line without a status column.
    Malformed,
}

/// What one export file contributes to the tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFile {
    /// Members who joined, each listed once, in order of first appearance.
    pub joined: Vec<String>,
    pub malformed_lines: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the series directories directly under `root`, sorted by name.
///
/// Directories whose name starts with `hidden_marker` are skipped.  Fails
/// with [`RosterError::DirectoryUnreadable`] when `root` itself cannot be
/// listed.
pub fn find_series_dirs(root: &Path, hidden_marker: char) -> Result<Vec<SeriesDir>> {
    let dirs = list_children(root)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(hidden_marker) {
                debug!("Skipping hidden directory {}", entry.path().display());
                return None;
            }
            Some(SeriesDir {
                name,
                path: entry.into_path(),
            })
        })
        .collect();

    Ok(dirs)
}

/// Find the event files directly inside `series_dir`, sorted by name.
pub fn find_event_files(series_dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_children(series_dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    Ok(files)
}

/// Decode raw export bytes into text.
///
/// UTF-16 (either byte order) is recognised by its BOM, or without one by the
/// NUL high bytes of its code units.  Everything else is read as UTF-8,
/// replacing invalid sequences.  Any NUL characters left afterwards are
/// removed.
pub fn decode_export(bytes: &[u8]) -> String {
    let text = if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
        decode_utf16(rest, u16::from_le_bytes)
    } else if let Some(rest) = bytes.strip_prefix(UTF16BE_BOM) {
        decode_utf16(rest, u16::from_be_bytes)
    } else if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        String::from_utf8_lossy(rest).into_owned()
    } else if let Some(to_unit) = sniff_utf16(bytes) {
        decode_utf16(bytes, to_unit)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    }
}

/// Classify a single record.
///
/// Only the first two fields are looked at.  Both are trimmed; an empty name
/// means "no member".  A record without a status column is malformed unless
/// it is blank.
pub fn parse_record(record: &StringRecord) -> ParsedRecord<'_> {
    let name = record.get(0).unwrap_or_default().trim();
    let Some(status) = record.get(1) else {
        return if name.is_empty() {
            ParsedRecord::NotJoined
        } else {
            ParsedRecord::Malformed
        };
    };

    if !name.is_empty() && status.trim() == JOINED_STATUS {
        ParsedRecord::Joined(name)
    } else {
        ParsedRecord::NotJoined
    }
}

/// Parse decoded export text.  The first record is a header and is ignored.
///
/// `path` is only used for log messages.
pub fn parse_export(path: &Path, text: &str) -> EventFile {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut seen: HashSet<String> = HashSet::new();
    let mut file = EventFile::default();

    for (idx, result) in reader.records().enumerate() {
        // Data records start on line 2.
        let fallback_line = idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                file.malformed_lines += 1;
                debug!(
                    "Unreadable record in {} near line {}: {}",
                    path.display(),
                    fallback_line,
                    e
                );
                continue;
            }
        };

        match parse_record(&record) {
            ParsedRecord::Joined(name) => {
                if seen.insert(name.to_string()) {
                    file.joined.push(name.to_string());
                }
            }
            ParsedRecord::NotJoined => {}
            ParsedRecord::Malformed => {
                file.malformed_lines += 1;
                let err = RosterError::MalformedRecord {
                    path: path.to_path_buf(),
                    line: record
                        .position()
                        .map_or(fallback_line, |pos| pos.line() as usize),
                    reason: "expected at least 2 tab-separated fields".to_string(),
                };
                debug!("{}", err);
            }
        }
    }

    file
}

/// Read and parse one export file.
///
/// The file handle is closed before this returns.
pub fn read_event_file(path: &Path) -> Result<EventFile> {
    let bytes = std::fs::read(path).map_err(|source| RosterError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let file = parse_export(path, &decode_export(&bytes));

    debug!(
        "File {}: {} joined, {} malformed",
        path.display(),
        file.joined.len(),
        file.malformed_lines,
    );

    Ok(file)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// List the immediate children of `dir`, sorted by file name.
///
/// An unreadable `dir` is an error; an unreadable child is logged and left
/// out.
fn list_children(dir: &Path) -> Result<Vec<DirEntry>> {
    let unreadable = |source: io::Error| RosterError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(dir).map_err(unreadable)?;
    if !metadata.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => children.push(entry),
            Err(err) if err.depth() == 0 => {
                let msg = err.to_string();
                return Err(unreadable(
                    err.into_io_error().unwrap_or_else(|| io::Error::other(msg)),
                ));
            }
            Err(err) => warn!("Skipping unreadable entry in {}: {}", dir.display(), err),
        }
    }

    Ok(children)
}

/// Byte order of BOM-less UTF-16, guessed from where the NUL bytes sit.
///
/// Mostly-Latin UTF-16 has a zero high byte in most code units: at odd
/// offsets for little endian, at even offsets for big endian.
fn sniff_utf16(bytes: &[u8]) -> Option<UnitReader> {
    let pairs = bytes.len() / 2;
    if pairs == 0 {
        return None;
    }

    let (mut even, mut odd) = (0usize, 0usize);
    for pair in bytes.chunks_exact(2) {
        if pair[0] == 0 {
            even += 1;
        }
        if pair[1] == 0 {
            odd += 1;
        }
    }

    let mostly = |count: usize| count * 2 > pairs;
    match (mostly(even), mostly(odd)) {
        (false, true) => Some(u16::from_le_bytes as UnitReader),
        (true, false) => Some(u16::from_be_bytes as UnitReader),
        _ => None,
    }
}

/// Decode UTF-16 code units, replacing unpaired surrogates.  A trailing odd
/// byte is dropped.
fn decode_utf16(bytes: &[u8], to_unit: UnitReader) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
