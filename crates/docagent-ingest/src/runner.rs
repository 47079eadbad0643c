//! Directory ingestion runs

use crate::ingestor::ingest_file_from_path;
use crate::lister::list_input_files;
use docagent_common::{IngestionRecord, Result};
use std::path::Path;
use tracing::{info, warn};

/// Ingest every default-eligible file in `input_dir`
pub fn run_ingestion(input_dir: impl AsRef<Path>) -> Result<Vec<IngestionRecord>> {
    run_ingestion_with(input_dir, None)
}

/// Ingest every file in `input_dir` whose extension is in `allowed_extensions`.
///
/// Files are processed one at a time in listing order. The first error stops
/// the run and is returned; records produced before it are discarded.
pub fn run_ingestion_with(
    input_dir: impl AsRef<Path>,
    allowed_extensions: Option<&[&str]>,
) -> Result<Vec<IngestionRecord>> {
    let input_dir = input_dir.as_ref();
    info!("Starting ingestion run for directory: {}", input_dir.display());

    let files = list_input_files(input_dir, allowed_extensions)?;
    if files.is_empty() {
        warn!("No eligible files found in {}", input_dir.display());
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(files.len());
    for file_path in &files {
        info!("Ingesting {}", file_path.display());
        records.push(ingest_file_from_path(file_path)?);
    }

    info!(
        "Completed ingestion run. {} file(s) processed.",
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use docagent_common::IngestError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory_returns_no_records() {
        let dir = TempDir::new().unwrap();
        assert!(run_ingestion(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_records_follow_listing_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.docx"), b"bb").unwrap();
        fs::write(dir.path().join("a.xlsx"), b"a").unwrap();

        let records = run_ingestion(dir.path()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a.xlsx", "b.docx"]);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.md"), b"b").unwrap();

        let records = run_ingestion_with(dir.path(), Some(&["md"][..])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].extension, "md");
    }

    #[test]
    fn test_missing_directory_propagates() {
        let dir = TempDir::new().unwrap();
        let err = run_ingestion(&dir.path().join("input")).unwrap_err();
        assert!(err.is_directory_error());
        assert!(matches!(err, IngestError::DirectoryNotFound(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_read_error_aborts_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        // Listed as a regular file, but reading it fails with EIO
        std::os::unix::fs::symlink("/proc/self/mem", dir.path().join("b.txt")).unwrap();
        fs::write(dir.path().join("c.txt"), b"c").unwrap();

        let err = run_ingestion(dir.path()).unwrap_err();
        assert!(!err.is_directory_error());
        match err {
            IngestError::Io { path, .. } => assert!(path.ends_with("b.txt")),
            other => panic!("expected an IO error, got {other:?}"),
        }
    }
}
