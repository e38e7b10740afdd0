//! Property-register audit log
//!
//! Append-only text file: one header per run (timestamp + register title),
//! then one derived property line per successfully produced workbook.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append the run header for this invocation
    pub fn begin_run(&self) -> Result<()> {
        let mut file = self.open()?;
        writeln!(
            file,
            "\n\nRun Date and Time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "Property Register:")?;
        Ok(())
    }

    /// Append one derived property line
    pub fn record(&self, property: &str) -> Result<()> {
        let mut file = self.open()?;
        writeln!(file, "{}", property)?;
        Ok(())
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open audit log: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_and_entries_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");

        let log = AuditLog::new(&path);
        log.begin_run().unwrap();
        log.record("Maple Court").unwrap();
        log.record("Oak Ridge").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Run Date and Time: "));
        assert!(content.contains("Property Register:\n"));
        assert!(content.ends_with("Maple Court\nOak Ridge\n"));
    }

    #[test]
    fn test_second_run_does_not_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");

        let log = AuditLog::new(&path);
        log.begin_run().unwrap();
        log.record("Maple Court").unwrap();
        log.begin_run().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("Run Date and Time:").count(), 2);
        assert!(content.contains("Maple Court"));
    }
}
