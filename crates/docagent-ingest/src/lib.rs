//! Document Ingestion Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Scans a local input folder for supported documents and reads each one
//! into an [`IngestionRecord`](docagent_common::IngestionRecord).
//!
//! # Modules
//!
//! - [`lister`]: find eligible files in a directory
//! - [`ingestor`]: read one file into a record
//! - [`runner`]: list then ingest a whole directory, fail-fast
//! - [`uploads`]: persist user uploads and ingest them with per-item results
//! - [`overview`]: describe what is currently in the input folder
//!
//! # Example
//!
//! ```no_run
//! use docagent_ingest::runner::run_ingestion;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     for record in run_ingestion(Path::new("input"))? {
//!         println!("{} {} bytes", record.name, record.size_bytes);
//!     }
//!     Ok(())
//! }
//! ```

pub mod ingestor;
pub mod lister;
pub mod overview;
pub mod runner;
pub mod uploads;

pub use ingestor::ingest_file_from_path;
pub use lister::{list_input_files, DEFAULT_ALLOWED_EXTENSIONS};
pub use runner::{run_ingestion, run_ingestion_with};

/// Default input folder, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "input";
