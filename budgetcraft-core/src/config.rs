//! Batch configuration
//!
//! All run constants live here: folders, log paths, sheet names, cell ranges
//! and the collision policy. Loaded from TOML; every sheet/range field has a
//! default matching the standard budget template.

use crate::naming::CollisionPolicy;
use crate::refs::{CellRange, CellRef};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Folder holding the raw .xlsx source files
    pub source_dir: PathBuf,
    /// Master template workbook (.xltm/.xlsm)
    pub template: PathBuf,
    /// Destination folder for generated .xlsm files
    pub output_dir: PathBuf,
    /// Property-register audit log
    pub audit_log: PathBuf,
    /// Processed-file ledger
    pub ledger: PathBuf,

    /// Sheet receiving the injected source table
    #[serde(default = "default_import_sheet")]
    pub import_sheet: String,
    /// Sheet whose naming cell yields the output file name
    #[serde(default = "default_naming_sheet")]
    pub naming_sheet: String,
    /// Sheets left visible in the output; everything else is hidden
    #[serde(default = "default_keep_visible")]
    pub keep_visible: Vec<String>,
    /// Range cleared before injection, e.g. "A1:N300"
    #[serde(default = "default_clear_range")]
    pub clear_range: String,
    /// Top-left cell the table is pasted at
    #[serde(default = "default_paste_anchor")]
    pub paste_anchor: String,
    /// Cell in the naming sheet holding the derived file name
    #[serde(default = "default_name_cell")]
    pub name_cell: String,

    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

fn default_import_sheet() -> String {
    "Import".to_string()
}

fn default_naming_sheet() -> String {
    "Budget Model".to_string()
}

fn default_keep_visible() -> Vec<String> {
    vec!["Budget Model".to_string(), "OBR".to_string()]
}

fn default_clear_range() -> String {
    "A1:N300".to_string()
}

fn default_paste_anchor() -> String {
    "A1".to_string()
}

fn default_name_cell() -> String {
    "A3".to_string()
}

/// Cell references parsed and validated once up front
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRefs {
    pub clear_range: CellRange,
    pub paste_anchor: CellRef,
    pub name_cell: CellRef,
    /// First injected cell, read back for the audit log
    pub audit_cell: CellRef,
}

impl BatchConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: BatchConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Parse the cell references and check the configuration is usable
    pub fn resolve(&self) -> Result<ResolvedRefs> {
        let clear_range = CellRange::parse(&self.clear_range)
            .ok_or_else(|| anyhow!("Invalid clear_range: {:?}", self.clear_range))?;
        let paste_anchor = CellRef::parse(&self.paste_anchor)
            .ok_or_else(|| anyhow!("Invalid paste_anchor: {:?}", self.paste_anchor))?;
        let name_cell = CellRef::parse(&self.name_cell)
            .ok_or_else(|| anyhow!("Invalid name_cell: {:?}", self.name_cell))?;

        if !clear_range.contains(paste_anchor) {
            anyhow::bail!(
                "paste_anchor {} lies outside clear_range {}",
                paste_anchor,
                clear_range
            );
        }
        if self.keep_visible.is_empty() {
            anyhow::bail!("keep_visible must name at least one sheet");
        }

        Ok(ResolvedRefs {
            clear_range,
            paste_anchor,
            name_cell,
            audit_cell: paste_anchor,
        })
    }
}
