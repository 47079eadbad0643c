//! Single-file ingestion

use docagent_common::{IngestError, IngestionRecord, Result};
use std::path::Path;
use tracing::{debug, error, info};

/// Read the file at `path` into a new [`IngestionRecord`].
///
/// The whole file is loaded into memory. Every call assigns a new
/// `file_id`, even for a path that was ingested before.
pub fn ingest_file_from_path(path: impl AsRef<Path>) -> Result<IngestionRecord> {
    let path = path.as_ref();
    info!("Ingesting file at path: {}", path.display());

    if !path.exists() {
        error!("File {} does not exist.", path.display());
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        error!("Path {} is not a file.", path.display());
        return Err(IngestError::NotAFile(path.to_path_buf()));
    }

    let content_bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let record = IngestionRecord::from_local_file(path, content_bytes);

    debug!(
        name = %record.name,
        extension = %record.extension,
        size_bytes = record.size_bytes,
        "File metadata"
    );
    info!("File {} ingested successfully.", path.display());
    Ok(record)
}
