//! Thin wrappers around `csv` readers and writers.
//!
//! All tables in this project are headered CSV files; these helpers attach
//! path context to open failures and create parent directories before
//! writing so callers can point outputs at not-yet-existing directories.
//! Writers never emit serde-derived headers: callers write the fixed header
//! row up front, which keeps the columns present even when a run produces
//! zero data rows.

use std::{fs, fs::File, path::Path};

use anyhow::{Context, Result};
use csv::{Reader, ReaderBuilder, Writer, WriterBuilder};

/// Open a headered CSV file for typed reading.
pub fn open_csv_reader(path: &Path) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Create a CSV writer, creating parent directories as needed.
///
/// The caller writes the header row explicitly; `serialize` then emits
/// data rows only.
pub fn create_csv_writer(path: &Path) -> Result<Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_creates_missing_parent_directories() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("nested/dir/out.csv");
        let mut writer = create_csv_writer(&path).expect("writer");
        writer.write_record(["a", "b"]).unwrap();
        writer.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reader_reports_missing_file_with_path() {
        let err = open_csv_reader(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("exist.csv"));
    }
}
