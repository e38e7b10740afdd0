//! Workbook service backend built on umya-spreadsheet
//!
//! The template is read fully into memory once; each source file gets a clone
//! of it, so template state never leaks between items.

use super::{WorkbookError, WorkbookInstance, WorkbookService};
use crate::reader::{CellValue, SourceTable};
use crate::refs::{CellRange, CellRef};
use std::path::Path;
use umya_spreadsheet::{CellRawValue, Spreadsheet, reader::xlsx, writer};

#[derive(Default)]
pub struct UmyaWorkbookService {
    template: Option<Spreadsheet>,
}

impl UmyaWorkbookService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkbookService for UmyaWorkbookService {
    fn open_template(&mut self, path: &Path) -> Result<(), WorkbookError> {
        let book = xlsx::read(path).map_err(|e| WorkbookError::Backend(e.to_string()))?;
        self.template = Some(book);
        Ok(())
    }

    fn instantiate(&mut self) -> Result<Box<dyn WorkbookInstance>, WorkbookError> {
        let template = self.template.as_ref().ok_or(WorkbookError::NoTemplate)?;
        Ok(Box::new(UmyaWorkbook {
            book: template.clone(),
        }))
    }

    fn close(&mut self) -> Result<(), WorkbookError> {
        self.template = None;
        Ok(())
    }
}

struct UmyaWorkbook {
    book: Spreadsheet,
}

impl WorkbookInstance for UmyaWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> Result<(), WorkbookError> {
        let ws = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        // umya coordinates are (col, row), 1-based
        for row in range.start.row..=range.end.row {
            for col in range.start.col..=range.end.col {
                ws.get_cell_mut((col + 1, row + 1)).set_blank();
            }
        }
        Ok(())
    }

    fn write_table(
        &mut self,
        sheet: &str,
        anchor: CellRef,
        table: &SourceTable,
    ) -> Result<(), WorkbookError> {
        let ws = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        for (r, row) in table.rows().iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let cell =
                    ws.get_cell_mut((anchor.col + c as u32 + 1, anchor.row + r as u32 + 1));
                match value {
                    CellValue::Number(n) => {
                        cell.set_value_number(*n);
                    }
                    CellValue::Text(s) => {
                        cell.set_value(s.clone());
                    }
                    CellValue::Boolean(b) => {
                        cell.set_value_bool(*b);
                    }
                    CellValue::Empty => {}
                }
            }
        }
        Ok(())
    }

    fn set_sheet_visible(&mut self, sheet: &str, visible: bool) -> Result<(), WorkbookError> {
        let ws = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        ws.set_sheet_state(if visible { "visible" } else { "hidden" }.to_string());
        Ok(())
    }

    fn read_cell(&self, sheet: &str, cell: CellRef) -> Result<CellValue, WorkbookError> {
        let ws = self
            .book
            .get_sheet_by_name(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        let value = ws
            .get_cell((cell.col + 1, cell.row + 1))
            .map(|c| convert_cell_value(c.get_cell_value().get_raw_value()))
            .unwrap_or(CellValue::Empty);
        Ok(value)
    }

    fn save_xlsm(&mut self, path: &Path) -> Result<(), WorkbookError> {
        writer::xlsx::write(&self.book, path).map_err(|e| WorkbookError::Backend(e.to_string()))
    }
}

fn convert_cell_value(raw: &CellRawValue) -> CellValue {
    match raw {
        CellRawValue::Numeric(n) => CellValue::Number(*n),
        CellRawValue::Bool(b) => CellValue::Boolean(*b),
        CellRawValue::String(s) => CellValue::Text(s.to_string()),
        CellRawValue::RichText(rt) => CellValue::Text(rt.get_text().to_string()),
        // Inline strings not yet coerced by umya: try numbers first
        CellRawValue::Lazy(s) => {
            let txt = s.as_ref();
            if let Ok(n) = txt.parse::<f64>() {
                CellValue::Number(n)
            } else {
                CellValue::Text(txt.to_string())
            }
        }
        // Error cells carry no name worth deriving
        CellRawValue::Error(_) | CellRawValue::Empty => CellValue::Empty,
    }
}
