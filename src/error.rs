//! Error types for the rowpdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rowpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading workbooks or writing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// The workbook could not be opened, parsed, or the sheet does not exist.
    #[error("Cannot read workbook '{}': {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    /// A single row could not be rendered or written.
    #[error("Row {} could not be written to '{}': {reason}", index + 1, path.display())]
    RowRender {
        index: usize,
        path: PathBuf,
        reason: String,
    },

    /// The output directory could not be created.
    #[error("Cannot create output folder '{}': {source}", path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The requested sheet is not in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Error while laying out or serializing a document.
    #[error("Render error: {0}")]
    Render(String),

    /// Error while serializing sheet data.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Wrap a low-level reader error as [`Error::SourceUnreadable`].
    ///
    /// Errors that already are `SourceUnreadable` are returned unchanged.
    pub fn unreadable(path: impl Into<PathBuf>, err: Error) -> Self {
        match err {
            Error::SourceUnreadable { .. } => err,
            other => Error::SourceUnreadable {
                path: path.into(),
                reason: other.to_string(),
            },
        }
    }

    /// Whether this error aborts a whole batch rather than a single row.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::RowRender { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Render(err.to_string())
    }
}
