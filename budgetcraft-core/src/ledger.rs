//! Processed-file ledger
//!
//! One source file name per line, append-only. Loaded fully at run start;
//! a name is appended only after its output has been produced, so failed and
//! missing-name files stay eligible for the next run.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: HashSet<String>,
}

impl Ledger {
    /// Load the ledger, starting empty if the file does not exist yet
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read ledger: {}", path.display()))?;
            content
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };
        Ok(Self { path, entries })
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.entries.contains(file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a processed file, both in memory and on disk
    pub fn record(&mut self, file_name: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger: {}", self.path.display()))?;
        writeln!(file, "{}", file_name)
            .with_context(|| format!("Failed to append to ledger: {}", self.path.display()))?;
        self.entries.insert(file_name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::load(dir.path().join("processed.txt")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_persists_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed.txt");

        let mut ledger = Ledger::load(&path).unwrap();
        ledger.record("jan.xlsx").unwrap();
        ledger.record("feb.xlsx").unwrap();
        assert!(ledger.contains("jan.xlsx"));

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("jan.xlsx"));
        assert!(reloaded.contains("feb.xlsx"));
        assert!(!reloaded.contains("mar.xlsx"));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed.txt");
        std::fs::write(&path, "a.xlsx\n\nb.xlsx\n").unwrap();

        let ledger = Ledger::load(&path).unwrap();
        assert_eq!(ledger.len(), 2);
    }
}
