//! XLSX (Excel) workbook reading.
//!
//! Reads Office Open XML spreadsheets (.xlsx) into [`Sheet`](crate::Sheet)s:
//! the first non-blank row is the header, every other row becomes a
//! [`Row`](crate::Row) with one field per column.
//!
//! # Example
//!
//! ```no_run
//! use rowpdf::xlsx::XlsxReader;
//!
//! let reader = XlsxReader::open("staff.xlsx")?;
//! for name in reader.sheet_names() {
//!     let sheet = reader.read_sheet(Some(name))?;
//!     println!("{}: {} rows", name, sheet.row_count());
//! }
//! # Ok::<(), rowpdf::Error>(())
//! ```

mod reader;
mod shared_strings;
mod styles;

pub use reader::XlsxReader;
pub use styles::serial_to_timestamp;
