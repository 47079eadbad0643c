//! Document ingestion CLI - one ingestion run over the input folder

use anyhow::Result;
use clap::Parser;
use docagent_common::logging::{LogConfig, LogLevel, RunLogger};
use docagent_ingest::{run_ingestion_with, DEFAULT_INPUT_DIR};
use std::path::PathBuf;
use tracing::{error, info};

/// Application name used for the run log directory
const CLI_APP_NAME: &str = "cli_ingestion";

#[derive(Parser, Debug)]
#[command(name = "docagent-ingest")]
#[command(author, version, about = "Ingest supported documents from a local folder")]
struct Cli {
    /// Folder to scan for documents
    #[arg(long, env = "DOCAGENT_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Comma-separated extensions to ingest (defaults to pdf,txt,docx,csv,xlsx)
    #[arg(long, env = "DOCAGENT_EXTENSIONS", value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    let mut logger = RunLogger::new(log_config)?;
    let log_file = logger.configure_run_logger(CLI_APP_NAME)?;
    info!("CLI logging initialised. Run log file: {}", log_file.display());

    let extensions: Option<Vec<&str>> = cli
        .extensions
        .as_ref()
        .map(|exts| exts.iter().map(String::as_str).collect());

    let records = match run_ingestion_with(&cli.input_dir, extensions.as_deref()) {
        Ok(records) => records,
        Err(e) if e.is_directory_error() => {
            error!("Ingestion failed: {}", e);
            return Ok(());
        },
        Err(e) => {
            error!("Ingestion aborted: {}", e);
            return Err(e.into());
        },
    };

    for record in &records {
        info!(
            "Ingested file '{}' ({}) with id={} size={} bytes",
            record.name, record.extension, record.file_id, record.size_bytes
        );
    }

    Ok(())
}
