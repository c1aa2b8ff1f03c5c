//! Batch conversion of every row of a sheet into its own PDF.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::render::{LayoutOptions, RowDocumentBuilder};

/// File name prefix used when none is given.
pub const DEFAULT_PREFIX: &str = "row";

/// Output folder used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "pdf_output";

/// Options for [`convert_all`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Folder the documents are written to; created if missing
    pub output_dir: PathBuf,

    /// Sheet to convert; `None` selects the first sheet
    pub sheet: Option<String>,

    /// File name prefix, as in `{prefix}_001.pdf`
    pub prefix: String,

    /// Page layout for every document
    pub layout: LayoutOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sheet: None,
            prefix: DEFAULT_PREFIX.to_string(),
            layout: LayoutOptions::default(),
        }
    }
}

impl ConvertOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output folder.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Select a sheet by name.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Set the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the page layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

/// A row that could not be written.
#[derive(Debug)]
pub struct RowFailure {
    /// Zero-based record index
    pub index: usize,
    /// Path the document was meant to be written to
    pub path: PathBuf,
    /// What went wrong
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Name of the converted sheet
    pub sheet: String,
    /// Number of rows processed
    pub attempted: usize,
    /// Documents written, in row order
    pub created: Vec<PathBuf>,
    /// Rows that failed, in row order
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Number of documents written.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Whether every row produced a document.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.created.len() == self.attempted
    }
}

/// Progress notifications from [`convert_all_with_progress`].
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// The sheet was read and iteration is about to start.
    SheetLoaded {
        sheet: &'a str,
        rows: usize,
        columns: usize,
    },
    /// A document was written.
    RowWritten { index: usize, path: &'a Path },
    /// A row failed; the batch continues.
    RowFailed { index: usize, error: &'a Error },
}

/// File name for a record: `{prefix}_{index + 1}` zero-padded to three digits.
///
/// ```
/// assert_eq!(rowpdf::batch::output_file_name("row", 0), "row_001.pdf");
/// assert_eq!(rowpdf::batch::output_file_name("emp", 999), "emp_1000.pdf");
/// ```
pub fn output_file_name(prefix: &str, record_index: usize) -> String {
    format!("{}_{:03}.pdf", prefix, record_index + 1)
}

/// Convert every row of a sheet into its own PDF.
///
/// The output folder is created first, then the sheet is read once and its
/// rows are rendered in order. A failed row is logged and recorded in the
/// report without stopping the batch. Files already in the folder are left
/// alone, except those with the same generated names, which are replaced.
pub fn convert_all(workbook_path: impl AsRef<Path>, options: &ConvertOptions) -> Result<BatchReport> {
    convert_all_with_progress(workbook_path, options, |_| {})
}

/// Like [`convert_all`], reporting progress through `on_event`.
pub fn convert_all_with_progress<F>(
    workbook_path: impl AsRef<Path>,
    options: &ConvertOptions,
    mut on_event: F,
) -> Result<BatchReport>
where
    F: FnMut(&BatchEvent<'_>),
{
    let workbook_path = workbook_path.as_ref();
    let output_dir = &options.output_dir;

    fs::create_dir_all(output_dir).map_err(|source| Error::OutputFolder {
        path: output_dir.clone(),
        source,
    })?;

    let sheet = crate::read_sheet(workbook_path, options.sheet.as_deref())?;
    on_event(&BatchEvent::SheetLoaded {
        sheet: &sheet.name,
        rows: sheet.row_count(),
        columns: sheet.column_count(),
    });

    let builder = RowDocumentBuilder::with_layout(options.layout.clone());
    let mut report = BatchReport {
        sheet: sheet.name.clone(),
        attempted: sheet.row_count(),
        ..Default::default()
    };

    for (index, row) in sheet.rows.iter().enumerate() {
        let path = output_dir.join(output_file_name(&options.prefix, index));

        match builder.render_row(row, index, &path) {
            Ok(()) => {
                on_event(&BatchEvent::RowWritten { index, path: &path });
                report.created.push(path);
            }
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                tracing::warn!(record = index + 1, "{}", error);
                on_event(&BatchEvent::RowFailed {
                    index,
                    error: &error,
                });
                report.failures.push(RowFailure { index, path, error });
            }
        }
    }

    tracing::info!(
        sheet = %report.sheet,
        created = report.created_count(),
        failed = report.failures.len(),
        dir = %output_dir.display(),
        "batch finished"
    );

    Ok(report)
}
