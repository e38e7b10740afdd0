//! In-memory source table model

/// Scalar cell value as read from a source spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the value the way it should appear in a log line or file name.
    /// Numbers go through `Display`, so `12.0` renders as `12`.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
        }
    }
}

/// A parsed source file: ordered rows of ordered cell values, anchored at the
/// sheet origin. All rows are data; no header row is assumed.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn n_rows(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn n_cols(&self) -> u32 {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_values() {
        assert_eq!(CellValue::Empty.display(), "");
        assert_eq!(CellValue::Number(12.0).display(), "12");
        assert_eq!(CellValue::Number(3.5).display(), "3.5");
        assert_eq!(CellValue::Text("Maple Court".into()).display(), "Maple Court");
        assert_eq!(CellValue::Boolean(true).display(), "true");
    }

    #[test]
    fn test_dimensions_use_widest_row() {
        let table = SourceTable::new(vec![
            vec![CellValue::Number(1.0)],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Text("x".into())],
        ]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
    }
}
