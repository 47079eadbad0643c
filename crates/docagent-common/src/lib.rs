//! Document Agent Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, error handling, and run-scoped logging for the document
//! ingestion workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the ingestion error taxonomy and result alias
//! - **Types**: the `IngestionRecord` produced for every ingested file
//! - **Logging**: per-run log directories with console and file sinks
//!
//! # Example
//!
//! ```no_run
//! use docagent_common::logging::{LogConfig, RunLogger};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut logger = RunLogger::new(LogConfig::from_env()?)?;
//!     let log_file = logger.configure_run_logger("cli_ingestion")?;
//!     info!("Writing run log to {}", log_file.display());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{IngestError, Result};
pub use types::{IngestionRecord, IngestionSource, RecordSummary};
