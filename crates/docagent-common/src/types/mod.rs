//! Common types used across the ingestion workspace

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Prefix of every generated file identifier
pub const FILE_ID_PREFIX: &str = "F-";

/// Number of hex characters kept from the generated UUID
pub const FILE_ID_HEX_LEN: usize = 8;

/// Where an ingested file came from.
///
/// Only local-folder ingestion exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IngestionSource {
    #[default]
    LocalFolder,
}

impl std::fmt::Display for IngestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestionSource::LocalFolder => write!(f, "local_folder"),
        }
    }
}

/// The in-memory result of ingesting one file.
///
/// `size_bytes` always equals `content_bytes.len()`. Serializing skips the
/// content, so a record can be written out but not read back; use
/// [`RecordSummary`] for data that has to round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionRecord {
    /// Short identifier, fresh for every ingestion (`F-` + 8 hex chars)
    pub file_id: String,

    /// Base name of the source file, extension included
    pub name: String,

    /// Lowercase extension without the leading dot, empty when absent
    pub extension: String,

    /// Provenance of the file
    pub source: IngestionSource,

    /// Path the file was read from
    pub path: String,

    /// Byte length of the content at read time
    pub size_bytes: u64,

    /// Raw file content
    #[serde(skip)]
    pub content_bytes: Vec<u8>,
}

impl IngestionRecord {
    /// Build a record for content read from `path`, assigning a new file id
    pub fn from_local_file(path: &Path, content_bytes: Vec<u8>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file_id: generate_file_id(),
            name,
            extension: extension_of(path),
            source: IngestionSource::LocalFolder,
            path: path.to_string_lossy().into_owned(),
            size_bytes: content_bytes.len() as u64,
            content_bytes,
        }
    }

    /// Metadata view without the content, as shown in summary tables
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            file_id: self.file_id.clone(),
            name: self.name.clone(),
            extension: self.extension.clone(),
            size_bytes: self.size_bytes,
            path: self.path.clone(),
        }
    }
}

/// Row of the "ingested successfully" table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub file_id: String,
    pub name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub path: String,
}

/// Generate a short, random file identifier such as `F-1a2b3c4d`.
///
/// Collisions are unlikely but not ruled out.
pub fn generate_file_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", FILE_ID_PREFIX, &hex[..FILE_ID_HEX_LEN])
}

/// Normalize an extension for comparison: leading dots stripped, lowercased.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Normalized extension of `path`, or an empty string if it has none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_format() {
        let id = generate_file_id();
        assert_eq!(id.len(), FILE_ID_PREFIX.len() + FILE_ID_HEX_LEN);
        assert!(id.starts_with("F-"));
        assert!(id[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_file_ids_differ() {
        assert_ne!(generate_file_id(), generate_file_id());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PDF"), "pdf");
        assert_eq!(normalize_extension("Csv"), "csv");
        assert_eq!(normalize_extension("..txt"), "txt");
        assert_eq!(normalize_extension(&normalize_extension(".DocX")), "docx");
        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("input/REPORT.CSV")), "csv");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".hidden")), "");
    }

    #[test]
    fn test_record_from_local_file() {
        let record = IngestionRecord::from_local_file(Path::new("input/Notes.TXT"), b"hello".to_vec());
        assert_eq!(record.name, "Notes.TXT");
        assert_eq!(record.extension, "txt");
        assert_eq!(record.source, IngestionSource::LocalFolder);
        assert_eq!(record.path, "input/Notes.TXT");
        assert_eq!(record.size_bytes, 5);
        assert_eq!(record.size_bytes as usize, record.content_bytes.len());
    }

    #[test]
    fn test_serialization_skips_content() {
        let record = IngestionRecord::from_local_file(Path::new("a.csv"), b"x,y\n1,2\n".to_vec());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["source"], "local_folder");
        assert_eq!(json["size_bytes"], 8);
        assert!(json.get("content_bytes").is_none());

        let summary = record.summary();
        assert_eq!(summary.file_id, record.file_id);
        assert_eq!(summary.name, "a.csv");
    }

    #[test]
    fn test_summary_round_trips() {
        let record = IngestionRecord::from_local_file(Path::new("input/a.txt"), b"hello".to_vec());
        let summary = record.summary();

        let json = serde_json::to_string(&summary).unwrap();
        let restored: RecordSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, summary);
        assert_eq!(restored.size_bytes, record.content_bytes.len() as u64);
    }
}
