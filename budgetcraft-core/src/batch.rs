//! Batch runner
//!
//! One invocation is one full pass over the source folder: skip everything the
//! ledger already knows, drive the workbook service per remaining file, and
//! collect every item into exactly one of three terminal buckets. A single
//! file's failure never aborts the batch; only template/service startup does.

use crate::audit::AuditLog;
use crate::config::{BatchConfig, ResolvedRefs};
use crate::ledger::Ledger;
use crate::naming::{resolve_output_path, sanitize_name};
use crate::reader::{self, SourceTable};
use crate::workbook::{TemplateSession, WorkbookService};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Terminal bucket for one attempted source file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ItemOutcome {
    /// Output saved, audit log and ledger updated
    Produced {
        output: PathBuf,
        derived_name: String,
    },
    /// The naming cell came back empty; nothing was saved
    MissingName,
    /// Parse, injection, save or logging failure; nothing reached the ledger
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    pub source: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Result of one full batch pass
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Source files found, ledger-skipped ones included
    pub discovered: usize,
    /// Files skipped because the ledger already lists them
    pub skipped: usize,
    pub items: Vec<ItemRecord>,
}

impl RunReport {
    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    pub fn produced(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Produced { .. }))
            .count()
    }

    pub fn missing_name(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::MissingName))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Failed { .. }))
            .count()
    }

    /// Every discovered file must be accounted for: skipped by the ledger or
    /// landed in exactly one bucket
    pub fn is_consistent(&self) -> bool {
        self.produced() + self.missing_name() + self.failed() == self.attempted()
            && self.attempted() + self.skipped == self.discovered
    }
}

/// List the .xlsx files in the source folder, sorted by file name so runs and
/// reports are deterministic
pub fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read source folder: {}", dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("xlsx") {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Run one full batch pass.
///
/// Batch-fatal errors (unreadable source folder, template open failure,
/// service shutdown failure) propagate; everything per-file lands in the
/// report. The template session is released on every exit path.
pub fn run_batch(config: &BatchConfig, service: &mut dyn WorkbookService) -> Result<RunReport> {
    let refs = config.resolve()?;

    let mut ledger = Ledger::load(&config.ledger)?;
    let audit = AuditLog::new(&config.audit_log);
    audit.begin_run()?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output folder: {}", config.output_dir.display())
    })?;

    let sources = discover_sources(&config.source_dir)?;
    let discovered = sources.len();

    let mut session = TemplateSession::open(service, &config.template)
        .with_context(|| format!("Failed to open template: {}", config.template.display()))?;

    let mut skipped = 0usize;
    let mut items = Vec::new();

    for path in &sources {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if ledger.contains(&file_name) {
            skipped += 1;
            continue;
        }

        let outcome = match process_item(config, &refs, &mut session, path) {
            Ok(ProcessOutcome::Produced {
                output,
                derived_name,
                property,
            }) => {
                // Audit and ledger entries are part of the item's success; a
                // failed append keeps the file out of the ledger for a rerun
                match audit
                    .record(&property)
                    .and_then(|()| ledger.record(&file_name))
                {
                    Ok(()) => ItemOutcome::Produced {
                        output,
                        derived_name,
                    },
                    Err(e) => ItemOutcome::Failed {
                        reason: format!("{:#}", e),
                    },
                }
            }
            Ok(ProcessOutcome::MissingName) => ItemOutcome::MissingName,
            Err(e) => ItemOutcome::Failed {
                reason: format!("{:#}", e),
            },
        };

        items.push(ItemRecord {
            source: file_name,
            outcome,
        });
    }

    session
        .finish()
        .context("Failed to release the workbook service")?;

    Ok(RunReport {
        discovered,
        skipped,
        items,
    })
}

enum ProcessOutcome {
    Produced {
        output: PathBuf,
        derived_name: String,
        property: String,
    },
    MissingName,
}

fn process_item(
    config: &BatchConfig,
    refs: &ResolvedRefs,
    session: &mut TemplateSession<'_>,
    path: &Path,
) -> Result<ProcessOutcome> {
    let table = reader::read_table(path)?;
    check_fits(&table, refs)?;

    let mut wb = session
        .instantiate()
        .context("Failed to instantiate workbook from template")?;

    wb.clear_range(&config.import_sheet, &refs.clear_range)?;
    wb.write_table(&config.import_sheet, refs.paste_anchor, &table)?;

    for sheet in wb.sheet_names() {
        let visible = config.keep_visible.iter().any(|k| k == &sheet);
        wb.set_sheet_visible(&sheet, visible)?;
    }

    let raw_name = wb.read_cell(&config.naming_sheet, refs.name_cell)?.display();
    let derived_name = sanitize_name(raw_name.trim());
    if derived_name.is_empty() {
        // The unsaved workbook is dropped here, nothing persists
        return Ok(ProcessOutcome::MissingName);
    }

    let output = resolve_output_path(&config.output_dir, &derived_name, config.on_collision)
        .ok_or_else(|| anyhow!("Output already exists for derived name {:?}", derived_name))?;

    wb.save_xlsm(&output)
        .with_context(|| format!("Failed to save output: {}", output.display()))?;

    let property = wb.read_cell(&config.import_sheet, refs.audit_cell)?.display();

    Ok(ProcessOutcome::Produced {
        output,
        derived_name,
        property,
    })
}

fn check_fits(table: &SourceTable, refs: &ResolvedRefs) -> Result<()> {
    let available_rows = refs.clear_range.end.row - refs.paste_anchor.row + 1;
    let available_cols = refs.clear_range.end.col - refs.paste_anchor.col + 1;
    if table.n_rows() > available_rows || table.n_cols() > available_cols {
        anyhow::bail!(
            "Source table is {} x {} but only {} x {} fit between {} and the end of {}",
            table.n_rows(),
            table.n_cols(),
            available_rows,
            available_cols,
            refs.paste_anchor,
            refs.clear_range,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;
    use tempfile::tempdir;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.xlsx", "a.xlsx", "notes.txt", "old.xls"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.xlsx")).unwrap();

        let sources = discover_sources(dir.path()).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx"]);
    }

    #[test]
    fn test_report_buckets_and_consistency() {
        let report = RunReport {
            discovered: 5,
            skipped: 2,
            items: vec![
                ItemRecord {
                    source: "a.xlsx".into(),
                    outcome: ItemOutcome::Produced {
                        output: "out/A.xlsm".into(),
                        derived_name: "A".into(),
                    },
                },
                ItemRecord {
                    source: "b.xlsx".into(),
                    outcome: ItemOutcome::MissingName,
                },
                ItemRecord {
                    source: "c.xlsx".into(),
                    outcome: ItemOutcome::Failed {
                        reason: "boom".into(),
                    },
                },
            ],
        };
        assert_eq!(report.produced(), 1);
        assert_eq!(report.missing_name(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.is_consistent());

        let inconsistent = RunReport {
            discovered: 9,
            skipped: 0,
            items: vec![],
        };
        assert!(!inconsistent.is_consistent());
    }

    #[test]
    fn test_check_fits_rejects_oversized_table() {
        let config: BatchConfig = toml::from_str(
            r#"
                source_dir = "in"
                template = "t.xltm"
                output_dir = "out"
                audit_log = "run.log"
                ledger = "processed.txt"
                clear_range = "A1:B2"
            "#,
        )
        .unwrap();
        let refs = config.resolve().unwrap();

        let row = vec![CellValue::Number(1.0), CellValue::Number(2.0)];
        let fits = SourceTable::new(vec![row.clone(), row.clone()]);
        assert!(check_fits(&fits, &refs).is_ok());

        let too_tall = SourceTable::new(vec![row.clone(), row.clone(), row.clone()]);
        assert!(check_fits(&too_tall, &refs).is_err());

        let wide_row = vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Number(3.0),
        ];
        let too_wide = SourceTable::new(vec![wide_row]);
        assert!(check_fits(&too_wide, &refs).is_err());
    }
}
