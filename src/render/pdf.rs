//! PDF output for a laid-out record.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::model::Row;

use super::font::{encode_win_ansi, FontFace};
use super::layout::{layout_row, CellBox, Page, TextLine};
use super::options::LayoutOptions;

const PDF_VERSION: &str = "1.4";
const PRODUCER: &str = concat!("rowpdf ", env!("CARGO_PKG_VERSION"));

/// Renders one [`Row`] as a titled two-column PDF table.
///
/// Output is deterministic: the same row, index and layout always give the
/// same bytes.
///
/// # Example
///
/// ```no_run
/// use rowpdf::render::RowDocumentBuilder;
/// use rowpdf::{CellValue, Row};
///
/// let row = Row::from_pairs([("Name", CellValue::text("Ada")), ("Age", 36.0.into())]);
/// RowDocumentBuilder::new().render_row(&row, 0, "record_001.pdf")?;
/// # Ok::<(), rowpdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RowDocumentBuilder {
    layout: LayoutOptions,
}

impl RowDocumentBuilder {
    /// Create a builder with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a custom layout.
    pub fn with_layout(layout: LayoutOptions) -> Self {
        Self { layout }
    }

    /// The layout in use.
    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Lay out a row without producing a PDF.
    pub fn layout(&self, row: &Row, record_index: usize) -> Result<Vec<Page>> {
        layout_row(row, record_index, &self.layout)
    }

    /// Render a row to PDF bytes.
    pub fn to_bytes(&self, row: &Row, record_index: usize) -> Result<Vec<u8>> {
        let pages = self.layout(row, record_index)?;
        let mut doc = build_document(&pages, &self.layout, record_index)?;

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::Render(e.to_string()))?;
        Ok(bytes)
    }

    /// Render a row and write it to `output_path`.
    ///
    /// Failures are reported as [`Error::RowRender`] for this row only.
    pub fn render_row(
        &self,
        row: &Row,
        record_index: usize,
        output_path: impl AsRef<Path>,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        let row_error = |reason: String| Error::RowRender {
            index: record_index,
            path: output_path.to_path_buf(),
            reason,
        };

        let bytes = self
            .to_bytes(row, record_index)
            .map_err(|e| row_error(e.to_string()))?;
        fs::write(output_path, bytes).map_err(|e| row_error(e.to_string()))?;

        tracing::debug!(
            record = record_index + 1,
            fields = row.len(),
            path = %output_path.display(),
            "wrote record"
        );
        Ok(())
    }
}

fn build_document(pages: &[Page], opts: &LayoutOptions, record_index: usize) -> Result<Document> {
    let mut doc = Document::with_version(PDF_VERSION);

    let pages_id = doc.new_object_id();
    let regular_id = add_font(&mut doc, FontFace::Regular);
    let bold_id = add_font(&mut doc, FontFace::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, opts),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                opts.page_width.into(),
                opts.page_height.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&format!("Record {}", record_index + 1)),
        "Producer" => text_string(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    Ok(doc)
}

fn add_font(doc: &mut Document, face: FontFace) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn text_string(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

fn page_operations(page: &Page, opts: &LayoutOptions) -> Vec<Operation> {
    let mut ops = Vec::new();

    for cell in &page.cells {
        draw_cell(&mut ops, cell, opts);
    }
    if let Some(title) = &page.title {
        draw_text(&mut ops, title);
    }

    ops
}

fn draw_cell(ops: &mut Vec<Operation>, cell: &CellBox, opts: &LayoutOptions) {
    let rect = || -> Vec<Object> {
        vec![
            cell.x.into(),
            (cell.top - cell.height).into(),
            cell.width.into(),
            cell.height.into(),
        ]
    };

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("g", vec![cell.fill.into()]));
    ops.push(Operation::new("re", rect()));
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("G", vec![0.into()]));
    ops.push(Operation::new("w", vec![opts.grid_width.into()]));
    ops.push(Operation::new("re", rect()));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("Q", vec![]));

    for line in &cell.lines {
        draw_text(ops, line);
    }
}

fn draw_text(ops: &mut Vec<Operation>, line: &TextLine) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("g", vec![0.into()]));
    ops.push(Operation::new(
        "Tf",
        vec![line.face.resource_name().into(), line.size.into()],
    ));
    ops.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
    ops.push(Operation::new("Tj", vec![text_string(&line.text)]));
    ops.push(Operation::new("ET", vec![]));
}
