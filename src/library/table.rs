//! The persisted library table.
//!
//! One record per row, columns `id, name, artist, rating, play_count` in that
//! order. A header row is optional when reading and is recognised by an `id`
//! first column whose rating column is not a number.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::error::{LibraryError, MalformedRow, MalformedRows};
use super::record::{LibraryRecord, check_rating};

pub const COLUMNS: [&str; 5] = ["id", "name", "artist", "rating", "play_count"];

/// Records in table order, keyed by track id.
pub type Entries = Vec<(String, LibraryRecord)>;

pub(super) fn read_table(path: &Path) -> Result<Entries, LibraryError> {
    let file = File::open(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(file).map_err(|e| match e {
        ParseFailure::Io(source) => LibraryError::Io {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Malformed(rows) => LibraryError::Malformed(rows),
    })
}

#[derive(Debug)]
pub(super) enum ParseFailure {
    Io(io::Error),
    Malformed(MalformedRows),
}

/// Parse every row, collecting all malformed rows before failing.
pub(super) fn parse_table<R: Read>(reader: R) -> Result<Entries, ParseFailure> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Entries::new();
    let mut malformed: Vec<MalformedRow> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, result) in reader.records().enumerate() {
        let fallback_line = i as u64 + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(ParseFailure::Io(io::Error::from(e)));
                }
                malformed.push(MalformedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        if i == 0 && is_header(&record) {
            continue;
        }

        match parse_row(&record) {
            Ok((id, rec)) => {
                if !seen.insert(id.clone()) {
                    malformed.push(MalformedRow {
                        line,
                        reason: format!("duplicate track id {id:?}"),
                    });
                    continue;
                }
                entries.push((id, rec));
            }
            Err(reason) => malformed.push(MalformedRow { line, reason }),
        }
    }

    if malformed.is_empty() {
        Ok(entries)
    } else {
        Err(ParseFailure::Malformed(MalformedRows(malformed)))
    }
}

fn is_header(record: &StringRecord) -> bool {
    let first = record.get(0).unwrap_or_default().trim();
    let rating = record.get(3).unwrap_or_default().trim();
    first.eq_ignore_ascii_case(COLUMNS[0]) && rating.parse::<i64>().is_err()
}

fn parse_row(record: &StringRecord) -> Result<(String, LibraryRecord), String> {
    if record.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            record.len()
        ));
    }

    // Text columns are kept verbatim; only the numbers tolerate padding.
    let id = &record[0];
    if id.trim().is_empty() {
        return Err("empty track id".to_string());
    }
    let name = &record[1];
    if name.trim().is_empty() {
        return Err(format!("track {id:?} has an empty name"));
    }
    let artist = &record[2];
    if artist.trim().is_empty() {
        return Err(format!("track {id:?} has an empty artist"));
    }

    let rating_text = &record[3];
    let rating: i64 = rating_text
        .trim()
        .parse()
        .map_err(|_| format!("rating {rating_text:?} is not a whole number"))?;
    let rating = check_rating(rating).map_err(|e| e.to_string())?;

    let count_text = &record[4];
    let play_count: u32 = count_text
        .trim()
        .parse()
        .map_err(|_| format!("play count {count_text:?} is not a non-negative whole number"))?;

    Ok((
        id.to_string(),
        LibraryRecord {
            name: name.to_string(),
            artist: artist.to_string(),
            rating,
            play_count,
        },
    ))
}

/// Rewrite the whole table at `path`.
///
/// Rows go to a sibling `.tmp` file first, which then replaces `path`, so a
/// failed write leaves the previous table intact.
pub(super) fn write_table(
    path: &Path,
    entries: &[(String, LibraryRecord)],
    header: bool,
) -> Result<(), LibraryError> {
    let io_err = |source: io::Error| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = write_rows(&temp_path, entries, header) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(e));
    }
    Ok(())
}

fn write_rows(
    temp_path: &Path,
    entries: &[(String, LibraryRecord)],
    header: bool,
) -> io::Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    if header {
        writer.write_record(COLUMNS)?;
    }
    for (id, rec) in entries {
        let rating = rec.rating.to_string();
        let play_count = rec.play_count.to_string();
        writer.write_record([
            id.as_str(),
            rec.name.as_str(),
            rec.artist.as_str(),
            rating.as_str(),
            play_count.as_str(),
        ])?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
