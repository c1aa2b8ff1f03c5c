//! # rowpdf
//!
//! Turn every row of an Excel sheet into its own printable PDF record.
//!
//! A sheet is read from an `.xlsx` workbook, its first non-blank row is
//! taken as the header, and each following row becomes a one-page (or
//! longer) document titled `Record N` with a two-column table of field
//! names and values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rowpdf::{convert_all, ConvertOptions};
//!
//! let options = ConvertOptions::new()
//!     .with_output_dir("pdf_output")
//!     .with_prefix("emp");
//!
//! let report = convert_all("employees.xlsx", &options)?;
//! println!("{} of {} documents created", report.created_count(), report.attempted);
//! # Ok::<(), rowpdf::Error>(())
//! ```
//!
//! ## Reading Sheets
//!
//! ```no_run
//! use rowpdf::xlsx::XlsxReader;
//!
//! // Sheet names in workbook order
//! let names = rowpdf::list_sheets("data.xlsx")?;
//!
//! // Several sheets from one opened workbook
//! let reader = XlsxReader::open("data.xlsx")?;
//! for name in reader.sheet_names() {
//!     let sheet = reader.read_sheet(Some(name))?;
//!     println!("{}: {} rows", sheet.name, sheet.row_count());
//! }
//! # Ok::<(), rowpdf::Error>(())
//! ```

pub mod batch;
pub mod container;
pub mod error;
pub mod model;
pub mod render;
pub mod xlsx;

// Re-exports
pub use batch::{
    convert_all, convert_all_with_progress, BatchEvent, BatchReport, ConvertOptions, RowFailure,
    DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX,
};
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use model::{CellValue, Field, Row, Sheet};
pub use render::{LayoutOptions, RowDocumentBuilder};

use std::path::Path;
use xlsx::XlsxReader;

/// List the sheet names of a workbook, in workbook order.
///
/// # Example
///
/// ```no_run
/// for name in rowpdf::list_sheets("data.xlsx")? {
///     println!("{}", name);
/// }
/// # Ok::<(), rowpdf::Error>(())
/// ```
pub fn list_sheets(workbook_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = workbook_path.as_ref();
    let reader = XlsxReader::open(path).map_err(|e| Error::unreadable(path, e))?;
    Ok(reader.sheet_names().into_iter().map(String::from).collect())
}

/// Read one sheet as a list of records.
///
/// `None` selects the first sheet. Any failure, including an unknown sheet
/// name, is reported as [`Error::SourceUnreadable`].
///
/// # Example
///
/// ```no_run
/// let sheet = rowpdf::read_sheet("employees.xlsx", Some("Staff"))?;
/// for row in &sheet.rows {
///     println!("{:?}", row.get("Name"));
/// }
/// # Ok::<(), rowpdf::Error>(())
/// ```
pub fn read_sheet(workbook_path: impl AsRef<Path>, sheet_name: Option<&str>) -> Result<Sheet> {
    let path = workbook_path.as_ref();
    let sheet = XlsxReader::open(path)
        .and_then(|reader| reader.read_sheet(sheet_name))
        .map_err(|e| Error::unreadable(path, e))?;

    tracing::info!(
        sheet = %sheet.name,
        rows = sheet.row_count(),
        columns = sheet.column_count(),
        "read sheet from {}",
        path.display()
    );
    Ok(sheet)
}

/// Read one sheet from workbook bytes.
///
/// Errors are reported like [`read_sheet`], with `<memory>` as the path.
pub fn read_sheet_bytes(data: &[u8], sheet_name: Option<&str>) -> Result<Sheet> {
    XlsxReader::from_bytes(data.to_vec())
        .and_then(|reader| reader.read_sheet(sheet_name))
        .map_err(|e| Error::unreadable("<memory>", e))
}
