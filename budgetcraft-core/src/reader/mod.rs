//! Source spreadsheet reader using calamine

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

pub mod table;

pub use table::{CellValue, SourceTable};

/// Read the first worksheet of a source file into a table.
///
/// The table is anchored at the sheet origin: if the used range starts below or
/// right of A1, the leading rows/columns come back as `Empty` so positions are
/// preserved when the table is pasted at the injection anchor.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    let path = path.as_ref();
    let mut excel = open_workbook_auto(path)
        .with_context(|| format!("Failed to open source file: {}", path.display()))?;

    let range = excel
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Source file has no worksheets: {}", path.display()))?
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;

    Ok(parse_range(&range))
}

fn parse_range(range: &Range<Data>) -> SourceTable {
    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return SourceTable::default();
    };

    let mut rows = Vec::with_capacity((end.0 + 1) as usize);
    for row in 0..=end.0 {
        let mut cells = Vec::with_capacity((end.1 + 1) as usize);
        for col in 0..=end.1 {
            let value = if row < start.0 || col < start.1 {
                CellValue::Empty
            } else {
                range
                    .get(((row - start.0) as usize, (col - start.1) as usize))
                    .map(parse_cell_value)
                    .unwrap_or(CellValue::Empty)
            };
            cells.push(value);
        }
        rows.push(cells);
    }

    SourceTable::new(rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        // Error cells carry no usable scalar; the template sees them as blanks
        Data::Error(_) => CellValue::Empty,
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
