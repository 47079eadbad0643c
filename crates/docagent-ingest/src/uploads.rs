//! Upload intake
//!
//! Saves user-supplied files into the input folder and ingests them. Unlike a
//! directory run, a batch of uploads never stops early: every upload gets its
//! own [`UploadReport`] carrying either the record or a typed failure.

use crate::ingestor::ingest_file_from_path;
use crate::lister::allowed_extension_set;
use docagent_common::types::extension_of;
use docagent_common::{IngestError, IngestionRecord, RecordSummary};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info};

/// Longest accepted upload file name, in bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// A file received from a user, not yet written to disk
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Filename is required and cannot be empty")]
    FilenameRequired,
    #[error("Filename must not exceed 255 characters")]
    FilenameLength,
    #[error("Filename '{0}' must not contain path separators")]
    InvalidFilename(String),
    #[error("Unsupported file type '{extension}' for '{name}'")]
    UnsupportedExtension { name: String, extension: String },
    #[error("Failed to save upload to '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Outcome of one upload
#[derive(Debug)]
pub struct UploadReport {
    pub name: String,
    pub outcome: Result<IngestionRecord, UploadError>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-upload results of one batch, in submission order
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub reports: Vec<UploadReport>,
}

impl UploadSummary {
    pub fn succeeded(&self) -> impl Iterator<Item = &IngestionRecord> {
        self.reports.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Failed uploads with their error
    pub fn failed(&self) -> impl Iterator<Item = (&str, &UploadError)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.name.as_str(), e)))
    }

    /// Rows for the "ingested successfully" table
    pub fn success_rows(&self) -> Vec<RecordSummary> {
        self.succeeded().map(IngestionRecord::summary).collect()
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

/// Create the input directory if it does not exist yet
pub fn ensure_input_dir(input_dir: &Path) -> Result<PathBuf, UploadError> {
    std::fs::create_dir_all(input_dir).map_err(|source| UploadError::Save {
        path: input_dir.to_path_buf(),
        source,
    })?;
    debug!("Ensured input directory exists at {}", input_dir.display());
    Ok(input_dir.to_path_buf())
}

/// Check that `name` is a bare file name that is safe to join onto the input folder
pub fn validate_upload_name(name: &str) -> Result<(), UploadError> {
    if name.trim().is_empty() {
        return Err(UploadError::FilenameRequired);
    }
    if name.len() > MAX_FILENAME_LEN {
        return Err(UploadError::FilenameLength);
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(UploadError::InvalidFilename(name.to_string())),
    }
}

/// Write `upload` into `input_dir`, replacing any file with the same name.
pub fn save_upload(input_dir: &Path, upload: &Upload) -> Result<PathBuf, UploadError> {
    validate_upload_name(&upload.name)?;
    let destination = ensure_input_dir(input_dir)?.join(&upload.name);

    std::fs::write(&destination, &upload.content).map_err(|source| UploadError::Save {
        path: destination.clone(),
        source,
    })?;

    info!("Persisted uploaded file to {}", destination.display());
    Ok(destination)
}

fn save_and_ingest(
    input_dir: &Path,
    upload: &Upload,
    allowed: &std::collections::HashSet<String>,
) -> Result<IngestionRecord, UploadError> {
    let extension = extension_of(Path::new(&upload.name));
    if !allowed.contains(&extension) {
        return Err(UploadError::UnsupportedExtension {
            name: upload.name.clone(),
            extension,
        });
    }

    let saved_path = save_upload(input_dir, upload)?;
    Ok(ingest_file_from_path(&saved_path)?)
}

/// Save and ingest each upload in order.
///
/// Uploads with an extension outside `allowed_extensions` (or the defaults)
/// are rejected before anything is written.
pub fn ingest_uploads(
    input_dir: &Path,
    uploads: &[Upload],
    allowed_extensions: Option<&[&str]>,
) -> UploadSummary {
    info!("Processing {} uploaded file(s).", uploads.len());
    let allowed = allowed_extension_set(allowed_extensions);

    let reports: Vec<UploadReport> = uploads
        .iter()
        .map(|upload| {
            let outcome = save_and_ingest(input_dir, upload, &allowed);
            match &outcome {
                Ok(_) => info!("Ingested {} successfully", upload.name),
                Err(e) => error!(error = %e, "Failed to ingest uploaded file {}", upload.name),
            }
            UploadReport {
                name: upload.name.clone(),
                outcome,
            }
        })
        .collect();

    let summary = UploadSummary { reports };
    info!(
        succeeded = summary.success_count(),
        failed = summary.failure_count(),
        "Upload batch complete"
    );
    summary
}
