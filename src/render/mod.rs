//! Output rendering for records.
//!
//! A [`Row`](crate::Row) becomes a one-record PDF: a bold centered title
//! followed by a two-column table of field names and values. Layout and
//! PDF writing are separate steps, so the geometry can be checked without
//! producing a file.
//!
//! Sheets and records can also be rendered as JSON.
//!
//! # Example
//!
//! ```no_run
//! use rowpdf::render::{LayoutOptions, RowDocumentBuilder};
//!
//! let sheet = rowpdf::read_sheet("employees.xlsx", None)?;
//! let builder = RowDocumentBuilder::with_layout(LayoutOptions::default());
//!
//! for (i, row) in sheet.rows.iter().enumerate() {
//!     builder.render_row(row, i, format!("out/row_{:03}.pdf", i + 1))?;
//! }
//! # Ok::<(), rowpdf::Error>(())
//! ```

mod font;
mod json;
mod layout;
mod options;
mod pdf;

pub use font::{encode_win_ansi, FontFace};
pub use json::{rows_to_json, to_json, to_json_default, JsonFormat};
pub use layout::{layout_row, wrap_text, CellBox, Column, Page, TextLine};
pub use options::{LayoutOptions, Margins, A4_HEIGHT, A4_WIDTH, POINTS_PER_INCH};
pub use pdf::RowDocumentBuilder;
