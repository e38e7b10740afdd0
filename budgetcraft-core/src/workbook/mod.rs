//! Workbook service abstraction
//!
//! The batch runner drives an external spreadsheet engine through these traits:
//! open a template once, stamp out a fresh workbook per source file, mutate it,
//! and save the result as a macro-enabled workbook. The production backend is
//! [`umya::UmyaWorkbookService`]; tests supply an in-memory service.

use crate::reader::{CellValue, SourceTable};
use crate::refs::{CellRange, CellRef};
use std::path::Path;
use thiserror::Error;

pub mod umya;

pub use umya::UmyaWorkbookService;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("no template is open")]
    NoTemplate,
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
    #[error("workbook backend error: {0}")]
    Backend(String),
}

/// One live workbook instantiated from the open template
pub trait WorkbookInstance {
    fn sheet_names(&self) -> Vec<String>;

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> Result<(), WorkbookError>;

    /// Write the table with its top-left cell at `anchor`
    fn write_table(
        &mut self,
        sheet: &str,
        anchor: CellRef,
        table: &SourceTable,
    ) -> Result<(), WorkbookError>;

    fn set_sheet_visible(&mut self, sheet: &str, visible: bool) -> Result<(), WorkbookError>;

    /// Read a single cell. For formula cells this is whatever value the engine
    /// reports (cached results included); no recalculation happens here.
    fn read_cell(&self, sheet: &str, cell: CellRef) -> Result<CellValue, WorkbookError>;

    fn save_xlsm(&mut self, path: &Path) -> Result<(), WorkbookError>;
}

/// The engine session: holds at most one open template at a time
pub trait WorkbookService {
    fn open_template(&mut self, path: &Path) -> Result<(), WorkbookError>;

    /// Create a fresh workbook from the open template
    fn instantiate(&mut self) -> Result<Box<dyn WorkbookInstance>, WorkbookError>;

    /// Release the template and shut the session down
    fn close(&mut self) -> Result<(), WorkbookError>;
}

/// Scoped template session: acquired once per batch, released exactly once.
///
/// `finish()` surfaces close errors on the normal path; if the batch unwinds
/// early, `Drop` still releases the service.
pub struct TemplateSession<'a> {
    service: &'a mut dyn WorkbookService,
    open: bool,
}

impl<'a> TemplateSession<'a> {
    pub fn open(
        service: &'a mut dyn WorkbookService,
        template: &Path,
    ) -> Result<Self, WorkbookError> {
        service.open_template(template)?;
        Ok(Self {
            service,
            open: true,
        })
    }

    pub fn instantiate(&mut self) -> Result<Box<dyn WorkbookInstance>, WorkbookError> {
        self.service.instantiate()
    }

    pub fn finish(mut self) -> Result<(), WorkbookError> {
        self.open = false;
        self.service.close()
    }
}

impl Drop for TemplateSession<'_> {
    fn drop(&mut self) {
        if self.open {
            let _ = self.service.close();
        }
    }
}
