//! Sheet model and header normalization.

use super::{CellValue, Field, Row};
use serde::Serialize;
use std::collections::HashMap;

/// A named table read from a workbook.
///
/// All rows share `columns`, in the same order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sheet {
    /// Sheet name as shown in the workbook tabs
    pub name: String,
    /// Column names, taken from the header row
    pub columns: Vec<String>,
    /// Data rows, header excluded
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from a grid of raw cells (row-major, header included).
    ///
    /// The first non-blank grid row becomes the header. Blank header cells
    /// are named `Unnamed: {i}`, repeated names get a `.1`, `.2` suffix,
    /// short rows are padded with [`CellValue::Empty`] and trailing blank
    /// rows are dropped.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Sheet::new(name);

        let width = grid
            .iter()
            .filter_map(|cells| cells.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |last| last + 1);
        if width == 0 {
            return sheet;
        }

        let mut rows = grid
            .into_iter()
            .skip_while(|cells| cells.iter().all(CellValue::is_empty));

        let header = rows.next().unwrap_or_default();
        sheet.columns = header_names(&header, width);

        let mut data: Vec<Vec<CellValue>> = rows.collect();
        while data
            .last()
            .is_some_and(|cells| cells.iter().all(CellValue::is_empty))
        {
            data.pop();
        }

        sheet.rows = data
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, CellValue::Empty);
                let mut row = Row::new();
                for (name, value) in sheet.columns.iter().zip(cells) {
                    row.push(Field {
                        name: name.clone(),
                        value,
                    });
                }
                row
            })
            .collect();

        sheet
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn header_names(header: &[CellValue], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(width);

    for i in 0..width {
        let base = match header.get(i) {
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => format!("Unnamed: {}", i),
        };

        let name = match seen.get(&base).copied() {
            Some(mut count) => {
                let candidate = loop {
                    count += 1;
                    let candidate = format!("{}.{}", base, count);
                    if !seen.contains_key(&candidate) {
                        break candidate;
                    }
                };
                seen.insert(base, count);
                candidate
            }
            None => base,
        };
        seen.entry(name.clone()).or_insert(0);
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_header_and_rows() {
        let grid = vec![
            vec![t("Name"), t("Age")],
            vec![t("Ada"), CellValue::Number(36.0)],
            vec![t("Linus")],
        ];
        let sheet = Sheet::from_grid("Staff", grid);

        assert_eq!(sheet.columns, ["Name", "Age"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[1].get("Age"), Some(&CellValue::Empty));
        for row in &sheet.rows {
            assert_eq!(row.names().collect::<Vec<_>>(), ["Name", "Age"]);
        }
    }

    #[test]
    fn test_unnamed_and_duplicate_headers() {
        let grid = vec![
            vec![t("Name"), CellValue::Empty, t("Name"), t("Name")],
            vec![t("a"), t("b"), t("c"), t("d"), t("e")],
        ];
        let sheet = Sheet::from_grid("S", grid);
        assert_eq!(
            sheet.columns,
            ["Name", "Unnamed: 1", "Name.1", "Name.2", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_duplicate_suffix_does_not_collide() {
        let grid = vec![vec![t("A"), t("A.1"), t("A")], vec![t("x")]];
        let sheet = Sheet::from_grid("S", grid);
        assert_eq!(sheet.columns, ["A", "A.1", "A.2"]);
    }

    #[test]
    fn test_blank_rows() {
        let grid = vec![
            vec![],
            vec![t("Name")],
            vec![t("Ada")],
            vec![],
            vec![t("Grace")],
            vec![CellValue::Empty],
            vec![],
        ];
        let sheet = Sheet::from_grid("S", grid);
        assert_eq!(sheet.row_count(), 3);
        assert!(sheet.rows[1].is_blank());
        assert_eq!(sheet.rows[2].get("Name"), Some(&t("Grace")));
    }

    #[test]
    fn test_empty_grid() {
        let sheet = Sheet::from_grid("Empty", vec![vec![], vec![CellValue::Empty]]);
        assert_eq!(sheet.column_count(), 0);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_header_only() {
        let sheet = Sheet::from_grid("S", vec![vec![t("Name"), t("Age")]]);
        assert_eq!(sheet.column_count(), 2);
        assert!(sheet.is_empty());
    }
}
