//! Input folder overview

use crate::lister::list_input_files;
use docagent_common::types::extension_of;
use docagent_common::IngestError;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info};

/// A supported file currently waiting in the input folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub path: String,
}

/// What the input folder looks like right now
#[derive(Debug)]
pub enum FolderOverview {
    /// The folder has not been created yet; the first upload creates it
    Missing,
    /// The configured path exists but cannot be used as the input folder
    Invalid(IngestError),
    /// Supported files in listing order, possibly none
    Files(Vec<FileEntry>),
}

impl FolderOverview {
    /// Message to show instead of a table, and whether it is an error
    pub fn notice(&self) -> Option<(&'static str, bool)> {
        match self {
            FolderOverview::Missing => {
                Some(("Input folder does not exist yet. Upload a file to create it.", false))
            },
            FolderOverview::Invalid(_) => {
                Some(("Configured input path exists but is not a directory.", true))
            },
            FolderOverview::Files(files) if files.is_empty() => {
                Some(("No supported files found in the input folder.", false))
            },
            FolderOverview::Files(_) => None,
        }
    }
}

/// Describe the supported files in `input_dir` without reading their content
pub fn input_folder_overview(input_dir: &Path) -> FolderOverview {
    let files = match list_input_files(input_dir, None) {
        Ok(files) => files,
        Err(IngestError::DirectoryNotFound(_)) => {
            info!(
                "Input directory {} is missing; will prompt the user to upload.",
                input_dir.display()
            );
            return FolderOverview::Missing;
        },
        Err(e) => {
            error!(error = %e, "Input path {} cannot be listed", input_dir.display());
            return FolderOverview::Invalid(e);
        },
    };

    // A file can disappear between listing and stat; leave it out.
    let entries = files.iter().filter_map(|path| file_entry(path)).collect();
    FolderOverview::Files(entries)
}

fn file_entry(path: &Path) -> Option<FileEntry> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!(error = %e, "Skipping {}: stat failed", path.display());
            return None;
        },
    };

    Some(FileEntry {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: extension_of(path),
        size_bytes: metadata.len(),
        path: path.to_string_lossy().into_owned(),
    })
}
