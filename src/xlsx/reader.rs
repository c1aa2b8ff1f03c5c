//! XLSX workbook reader.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet};
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::{serial_to_timestamp, Styles};

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from workbook.xml, with its worksheet part resolved.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    part: Option<String>,
}

/// Reader for XLSX (Excel) workbooks.
///
/// Opening a workbook parses the sheet list, shared strings and styles;
/// worksheets are parsed on demand.
pub struct XlsxReader {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
}

impl XlsxReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists(WORKBOOK_PART) {
            return Err(Error::MissingComponent(WORKBOOK_PART.to_string()));
        }

        let shared_strings = match container.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(_) => SharedStrings::default(),
        };

        let styles = container
            .read_xml("xl/styles.xml")
            .map(|xml| Styles::parse(&xml))
            .unwrap_or_default();

        let sheets = Self::parse_workbook(&container)?;

        tracing::debug!(
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            "opened workbook"
        );

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
        })
    }

    /// Parse workbook.xml for the sheet list, resolving each sheet's part.
    fn parse_workbook(container: &OoxmlContainer) -> Result<Vec<SheetInfo>> {
        let rels = container.read_relationships(WORKBOOK_PART)?;
        let xml = container.read_xml(WORKBOOK_PART)?;

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut sheets = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).to_string()
                                    });
                            }
                            // r:id, whatever the prefix is bound to
                            key if key.ends_with(b":id") => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        let part = rels
                            .get(&rel_id)
                            .map(|rel| OoxmlContainer::resolve_path(WORKBOOK_PART, &rel.target));
                        sheets.push(SheetInfo { name, part });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read a sheet by name, or the first sheet when `name` is `None`.
    pub fn read_sheet(&self, name: Option<&str>) -> Result<Sheet> {
        let index = match name {
            Some(name) => self
                .sheets
                .iter()
                .position(|s| s.name == name)
                .ok_or_else(|| Error::SheetNotFound(name.to_string()))?,
            None => 0,
        };
        self.read_sheet_at(index)
    }

    /// Read a sheet by its zero-based position.
    pub fn read_sheet_at(&self, index: usize) -> Result<Sheet> {
        let info = self.sheets.get(index).ok_or_else(|| {
            if self.sheets.is_empty() {
                Error::InvalidData("workbook has no sheets".to_string())
            } else {
                Error::SheetNotFound(format!("#{}", index + 1))
            }
        })?;

        let part = info.part.as_deref().ok_or_else(|| {
            Error::MissingComponent(format!("worksheet part for sheet '{}'", info.name))
        })?;

        // Chartsheets and dialog sheets have no cell data
        let grid = if part.contains("worksheets/") {
            let xml = self.container.read_xml(part)?;
            self.parse_worksheet(&xml)?
        } else {
            Vec::new()
        };

        Ok(Sheet::from_grid(info.name.clone(), grid))
    }

    /// Parse worksheet XML into a row-major grid of cells.
    ///
    /// Cells are placed by their `r` reference; cells without one follow the
    /// previous cell. Gaps are filled with [`CellValue::Empty`].
    fn parse_worksheet(&self, xml: &str) -> Result<Vec<Vec<CellValue>>> {
        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut row_idx = 0usize;
        let mut next_row = 0usize;
        let mut next_col = 0usize;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_phonetic = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = row_number(e).unwrap_or(next_row);
                        next_row = row_idx + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let pending = PendingCell::from_start(e, next_col);
                        next_col = pending.col + 1;
                        cell = Some(pending);
                    }
                    // Phonetic guide runs are not part of the cell text
                    b"rPh" => in_phonetic = true,
                    b"v" | b"t" if cell.is_some() && !in_phonetic => in_value = true,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        next_row = row_number(e).unwrap_or(next_row) + 1;
                    }
                    b"c" => {
                        next_col = PendingCell::from_start(e, next_col).col + 1;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(e)) => {
                    if in_value {
                        if let Some(pending) = cell.as_mut() {
                            pending.raw.push_str(&e.unescape().unwrap_or_default());
                        }
                    }
                }
                Ok(quick_xml::events::Event::CData(e)) => {
                    if in_value {
                        if let Some(pending) = cell.as_mut() {
                            pending.raw.push_str(&String::from_utf8_lossy(&e.into_inner()));
                        }
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            let value = self.resolve_cell_value(&pending);
                            if !value.is_empty() {
                                if grid.len() <= row_idx {
                                    grid.resize_with(row_idx + 1, Vec::new);
                                }
                                let cells = &mut grid[row_idx];
                                if cells.len() <= pending.col {
                                    cells.resize(pending.col + 1, CellValue::Empty);
                                }
                                cells[pending.col] = value;
                            }
                        }
                        in_value = false;
                    }
                    b"v" | b"t" => in_value = false,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Resolve a cell's raw text based on its type and style.
    fn resolve_cell_value(&self, cell: &PendingCell) -> CellValue {
        let raw = cell.raw.as_str();
        let value = match cell.cell_type.as_deref() {
            Some("s") => match raw.trim().parse::<usize>() {
                Ok(idx) => CellValue::text(self.shared_strings.get(idx).unwrap_or("")),
                Err(_) => CellValue::text(raw),
            },
            Some("b") => match raw.trim() {
                "1" | "true" => CellValue::Bool(true),
                "0" | "false" => CellValue::Bool(false),
                _ => CellValue::Empty,
            },
            // Error codes such as #N/A or #DIV/0! are kept as shown
            Some("e") | Some("str") | Some("inlineStr") | Some("d") => CellValue::text(raw),
            _ => self.resolve_number(raw, cell.style),
        };

        match value {
            CellValue::Text(ref s) if s.is_empty() => CellValue::Empty,
            other => other,
        }
    }

    fn resolve_number(&self, raw: &str, style: Option<usize>) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                if style.is_some_and(|s| self.styles.is_date_style(s)) {
                    if let Some(stamp) = serial_to_timestamp(n) {
                        return CellValue::Text(stamp);
                    }
                }
                CellValue::Number(n)
            }
            _ => CellValue::text(raw),
        }
    }
}

impl std::fmt::Debug for XlsxReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxReader")
            .field("sheets", &self.sheet_names())
            .field("shared_strings", &self.shared_strings.len())
            .finish()
    }
}

/// A `<c>` element being read.
#[derive(Debug)]
struct PendingCell {
    col: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    raw: String,
}

impl PendingCell {
    fn from_start(e: &quick_xml::events::BytesStart<'_>, default_col: usize) -> Self {
        let mut col = None;
        let mut cell_type = None;
        let mut style = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => col = column_index(&String::from_utf8_lossy(&attr.value)),
                b"t" => cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"s" => style = String::from_utf8_lossy(&attr.value).parse().ok(),
                _ => {}
            }
        }

        Self {
            col: col.unwrap_or(default_col),
            cell_type,
            style,
            raw: String::new(),
        }
    }
}

/// Zero-based row index from a `<row r="…">` attribute.
fn row_number(e: &quick_xml::events::BytesStart<'_>) -> Option<usize> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| String::from_utf8_lossy(&a.value).parse::<usize>().ok())
        .and_then(|r| r.checked_sub(1))
}

/// Zero-based column index from an A1-style reference (`"C7"` -> 2).
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }

    letters
        .iter()
        .try_fold(0usize, |acc, &b| {
            acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)
        })
        .map(|n| n - 1)
}
