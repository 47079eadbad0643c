//! Input file discovery

use docagent_common::types::{extension_of, normalize_extension};
use docagent_common::{IngestError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Extensions picked up when the caller does not pass an allow-list
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "txt", "docx", "csv", "xlsx"];

/// Normalized allow-set for `allowed`, or the defaults when `None`
pub fn allowed_extension_set(allowed: Option<&[&str]>) -> HashSet<String> {
    allowed
        .unwrap_or(&DEFAULT_ALLOWED_EXTENSIONS)
        .iter()
        .map(|ext| normalize_extension(ext))
        .collect()
}

/// List the files directly inside `input_dir` whose extension is allowed.
///
/// Subdirectories and other non-file entries are skipped. The result is
/// sorted by path; an empty directory yields an empty list.
pub fn list_input_files(
    input_dir: impl AsRef<Path>,
    allowed_extensions: Option<&[&str]>,
) -> Result<Vec<PathBuf>> {
    let input_dir = input_dir.as_ref();
    info!("Listing input files in directory: {}", input_dir.display());

    if !input_dir.exists() {
        error!("Input directory {} was not found.", input_dir.display());
        return Err(IngestError::DirectoryNotFound(input_dir.to_path_buf()));
    }

    if !input_dir.is_dir() {
        error!("Path {} is not a directory.", input_dir.display());
        return Err(IngestError::NotADirectory(input_dir.to_path_buf()));
    }

    let allowed = allowed_extension_set(allowed_extensions);
    debug!(?allowed, "Allowed extensions resolved");

    let entries = std::fs::read_dir(input_dir).map_err(|e| IngestError::io(input_dir, e))?;

    let mut matching_files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IngestError::io(input_dir, e))?.path();

        if !path.is_file() {
            debug!("Skipping non-file entry: {}", path.display());
            continue;
        }

        let ext = extension_of(&path);
        if allowed.contains(&ext) {
            info!("Queued file for ingestion: {}", path.display());
            matching_files.push(path);
        } else {
            debug!("Skipping file {} due to unsupported extension.", path.display());
        }
    }

    matching_files.sort();
    info!(
        "Found {} eligible file(s) in {}",
        matching_files.len(),
        input_dir.display()
    );
    Ok(matching_files)
}
