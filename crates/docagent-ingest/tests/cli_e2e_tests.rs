//! End-to-end tests for the docagent-ingest binary
//!
//! These tests validate:
//! - The default `input/` folder is scanned relative to the working directory
//! - Summary lines reach both the console and the run log file
//! - A missing input folder is logged without failing the process
//! - A file that cannot be read fails the process

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn ingest_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docagent-ingest").unwrap();
    cmd.current_dir(workdir)
        .env("LOG_DIR", workdir.join("logs"))
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FORMAT")
        .env_remove("LOG_FILTER")
        .env_remove("RUST_LOG")
        .env_remove("DOCAGENT_INPUT_DIR")
        .env_remove("DOCAGENT_EXTENSIONS");
    cmd
}

/// Find the single run log written under `logs/<date>/<run>/`
fn find_run_log(logs_root: &Path) -> PathBuf {
    let mut found = Vec::new();
    for day in fs::read_dir(logs_root).unwrap() {
        for run in fs::read_dir(day.unwrap().path()).unwrap() {
            for file in fs::read_dir(run.unwrap().path()).unwrap() {
                found.push(file.unwrap().path());
            }
        }
    }
    assert_eq!(found.len(), 1, "expected exactly one run log, found {found:?}");
    found.remove(0)
}

#[test]
fn test_ingests_default_input_folder() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), b"hello").unwrap();
    fs::write(input.join("b.pdf"), b"0123456789").unwrap();
    fs::write(input.join("ignore.exe"), b"MZ\0").unwrap();

    ingest_cmd(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Ingested file 'a.txt' (txt)"))
        .stderr(predicate::str::contains("size=10 bytes"))
        .stderr(predicate::str::contains("Ingested file 'ignore.exe'").not());

    let log_file = find_run_log(&dir.path().join("logs"));
    let file_name = log_file.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("cli_ingestion_"));
    assert!(file_name.ends_with(".log"));

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("Ingested file 'a.txt' (txt)"));
    assert!(contents.contains("Ingested file 'b.pdf' (pdf)"));
    assert!(contents.contains(" | INFO | "));
}

#[test]
fn test_missing_input_folder_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    ingest_cmd(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Ingestion failed"))
        .stderr(predicate::str::contains("was not found"));
}

#[test]
fn test_empty_input_folder() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("input")).unwrap();

    ingest_cmd(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No eligible files found"));
}

#[test]
fn test_custom_input_dir_and_extensions() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("readme.md"), b"# hi").unwrap();
    fs::write(docs.join("a.txt"), b"hello").unwrap();

    ingest_cmd(dir.path())
        .args(["--input-dir", "docs", "--extensions", "md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ingested file 'readme.md' (md)"))
        .stderr(predicate::str::contains("Ingested file 'a.txt'").not());
}

#[cfg(target_os = "linux")]
#[test]
fn test_unreadable_file_fails_process() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), b"hello").unwrap();
    std::os::unix::fs::symlink("/proc/self/mem", input.join("b.txt")).unwrap();
    fs::write(input.join("c.txt"), b"world").unwrap();

    ingest_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ingestion aborted"))
        .stderr(predicate::str::contains("b.txt"))
        .stderr(predicate::str::contains("Ingested file 'c.txt'").not());

    let contents = fs::read_to_string(find_run_log(&dir.path().join("logs"))).unwrap();
    assert!(contents.contains(" | ERROR | "));
}
