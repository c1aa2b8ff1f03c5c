//! Page layout of a single record.
//!
//! Layout is pure geometry: it turns a [`Row`] into positioned text and
//! boxes, one [`Page`] at a time, and knows nothing about PDF objects.
//! Coordinates are PDF user space (points, origin bottom-left).

use crate::error::{Error, Result};
use crate::model::Row;

use super::font::FontFace;
use super::options::LayoutOptions;

/// Which table column a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Value,
}

/// A line of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    /// Baseline
    pub y: f32,
    pub face: FontFace,
    pub size: f32,
}

/// One table cell (or the part of it that fits on a page).
#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    /// Position of the field in the row
    pub field_index: usize,
    pub column: Column,
    pub x: f32,
    /// Top edge
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Fill gray level (0 black, 1 white)
    pub fill: f32,
    pub lines: Vec<TextLine>,
    /// True when this box continues a row split from the previous page
    pub continued: bool,
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub title: Option<TextLine>,
    pub cells: Vec<CellBox>,
}

/// Lay out a record: the title on the first page, then one table row per
/// field, breaking to new pages as needed.
pub fn layout_row(row: &Row, record_index: usize, opts: &LayoutOptions) -> Result<Vec<Page>> {
    let min_row_height = opts.cell_padding_top + opts.leading + opts.cell_padding_bottom;
    if opts.content_height() < opts.title_leading.max(min_row_height) {
        return Err(Error::Render(format!(
            "page height {} leaves no room for content",
            opts.page_height
        )));
    }

    let mut pages = Vec::new();
    let mut page = Page {
        title: Some(title_line(record_index, opts)),
        cells: Vec::new(),
    };
    let mut cursor = opts.content_top() - opts.title_leading - opts.title_space_after;
    let bottom = opts.margins.bottom;
    let left = opts.table_left();

    let name_text_width = opts.name_column_width - 2.0 * opts.cell_padding_x;
    let value_text_width = opts.value_column_width - 2.0 * opts.cell_padding_x;

    for (field_index, field) in row.iter().enumerate() {
        let mut name_lines = wrap_text(&field.name, FontFace::Bold, opts.font_size, name_text_width);
        let mut value_lines = wrap_text(
            &field.value.to_string(),
            FontFace::Regular,
            opts.font_size,
            value_text_width,
        );
        let mut continued = false;

        loop {
            let needed = name_lines.len().max(value_lines.len()).max(1);
            let at_page_top = cursor >= opts.content_top();
            let fits = lines_that_fit(cursor - bottom, opts);

            if fits >= needed {
                let height = row_height(needed, opts);
                let span = RowSpan { field_index, top: cursor, height, continued };
                push_row(&mut page, span, &name_lines, &value_lines, left, opts);
                cursor -= height;
                break;
            }

            // Rows that fit on a fresh page move there whole; taller rows split.
            let fits_fresh_page = lines_that_fit(opts.content_height(), opts) >= needed;
            if fits == 0 || (fits_fresh_page && !at_page_top) {
                pages.push(std::mem::take(&mut page));
                cursor = opts.content_top();
                continue;
            }

            let head_names: Vec<String> = name_lines.drain(..fits.min(name_lines.len())).collect();
            let head_values: Vec<String> =
                value_lines.drain(..fits.min(value_lines.len())).collect();
            let height = row_height(fits, opts);
            let span = RowSpan { field_index, top: cursor, height, continued };
            push_row(&mut page, span, &head_names, &head_values, left, opts);

            continued = true;
            pages.push(std::mem::take(&mut page));
            cursor = opts.content_top();
        }
    }

    pages.push(page);
    Ok(pages)
}

fn title_line(record_index: usize, opts: &LayoutOptions) -> TextLine {
    let text = format!("Record {}", record_index + 1);
    let width = FontFace::Bold.text_width(&text, opts.title_font_size);
    TextLine {
        x: (opts.page_width - width) / 2.0,
        y: opts.content_top() - opts.title_font_size,
        face: FontFace::Bold,
        size: opts.title_font_size,
        text,
    }
}

fn row_height(lines: usize, opts: &LayoutOptions) -> f32 {
    opts.cell_padding_top + lines as f32 * opts.leading + opts.cell_padding_bottom
}

/// How many text lines a table row can hold in `available` points.
fn lines_that_fit(available: f32, opts: &LayoutOptions) -> usize {
    let for_text = available - opts.cell_padding_top - opts.cell_padding_bottom;
    if for_text < opts.leading {
        0
    } else {
        // Small epsilon so that exact fits are not lost to rounding
        ((for_text + 1e-3) / opts.leading).floor() as usize
    }
}

/// Vertical placement of one table row (or one piece of a split row).
#[derive(Debug, Clone, Copy)]
struct RowSpan {
    field_index: usize,
    top: f32,
    height: f32,
    continued: bool,
}

fn push_row(
    page: &mut Page,
    span: RowSpan,
    name_lines: &[String],
    value_lines: &[String],
    left: f32,
    opts: &LayoutOptions,
) {
    let name_x = left;
    let value_x = left + opts.name_column_width;

    page.cells.push(cell_box(
        span,
        Column::Name,
        (name_x, opts.name_column_width),
        FontFace::Bold,
        opts.name_shade,
        name_lines,
        opts,
    ));
    page.cells.push(cell_box(
        span,
        Column::Value,
        (value_x, opts.value_column_width),
        FontFace::Regular,
        1.0,
        value_lines,
        opts,
    ));
}

fn cell_box(
    span: RowSpan,
    column: Column,
    (x, width): (f32, f32),
    face: FontFace,
    fill: f32,
    lines: &[String],
    opts: &LayoutOptions,
) -> CellBox {
    let first_baseline = span.top - opts.cell_padding_top - opts.font_size;
    let lines = lines
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(i, text)| TextLine {
            text: text.clone(),
            x: x + opts.cell_padding_x,
            y: first_baseline - i as f32 * opts.leading,
            face,
            size: opts.font_size,
        })
        .collect();

    CellBox {
        field_index: span.field_index,
        column,
        x,
        top: span.top,
        width,
        height: span.height,
        fill,
        lines,
        continued: span.continued,
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words wrap at spaces; a word wider than
/// the line is split between characters. Empty text gives no lines.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    let space = face.text_width(" ", size);

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_width = 0.0f32;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = face.text_width(word, size);
            let gap = if current.is_empty() { 0.0 } else { space };

            if current_width + gap + word_width <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let mut buf = [0u8; 4];
                let ch_width = face.text_width(ch.encode_utf8(&mut buf), size);
                if current_width + ch_width > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        lines.push(current);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn staff_row() -> Row {
        Row::from_pairs([
            ("Name", CellValue::text("John Doe")),
            ("Age", CellValue::Number(28.0)),
            ("Email", CellValue::Empty),
        ])
    }

    fn name_cells(pages: &[Page]) -> Vec<(usize, String)> {
        pages
            .iter()
            .flat_map(|p| &p.cells)
            .filter(|c| c.column == Column::Name && !c.continued)
            .map(|c| {
                let text = c.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join(" ");
                (c.field_index, text)
            })
            .collect()
    }

    #[test]
    fn test_title_and_fields_in_order() {
        let pages = layout_row(&staff_row(), 0, &LayoutOptions::default()).unwrap();
        assert_eq!(pages.len(), 1);

        let title = pages[0].title.as_ref().unwrap();
        assert_eq!(title.text, "Record 1");
        assert_eq!(title.face, FontFace::Bold);

        assert_eq!(
            name_cells(&pages),
            vec![
                (0, "Name".to_string()),
                (1, "Age".to_string()),
                (2, "Email".to_string())
            ]
        );
    }

    #[test]
    fn test_cell_styles() {
        let opts = LayoutOptions::default();
        let pages = layout_row(&staff_row(), 4, &opts).unwrap();
        assert_eq!(pages[0].title.as_ref().unwrap().text, "Record 5");

        let cells = &pages[0].cells;
        assert_eq!(cells.len(), 6);
        let (name, value) = (&cells[2], &cells[3]);
        assert_eq!(name.column, Column::Name);
        assert_eq!(name.fill, opts.name_shade);
        assert_eq!(name.width, 180.0);
        assert_eq!(value.column, Column::Value);
        assert_eq!(value.fill, 1.0);
        assert_eq!(value.width, 288.0);
        assert_eq!(value.lines[0].text, "28");
        assert_eq!(value.lines[0].face, FontFace::Regular);
        assert_eq!(name.x + name.width, value.x);

        // Empty value: the row is still there, with no text
        assert!(cells[5].lines.is_empty());
        assert!(cells[5].height > 0.0);
    }

    #[test]
    fn test_rows_stack_downward() {
        let pages = layout_row(&staff_row(), 0, &LayoutOptions::default()).unwrap();
        let names: Vec<&CellBox> = pages[0].cells.iter().filter(|c| c.column == Column::Name).collect();
        for pair in names.windows(2) {
            assert!((pair[0].top - pair[0].height - pair[1].top).abs() < 1e-3);
        }
        let title = pages[0].title.as_ref().unwrap();
        assert!(names[0].top < title.y);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("alpha beta gamma", FontFace::Regular, 10.0, 60.0);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);

        let lines = wrap_text("line one\nline two", FontFace::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["line one", "line two"]);

        assert!(wrap_text("", FontFace::Regular, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_long_word() {
        let word = "x".repeat(100);
        let lines = wrap_text(&word, FontFace::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(FontFace::Regular.text_width(line, 10.0) <= 50.0);
        }
    }

    #[test]
    fn test_long_value_stays_inside_column() {
        let opts = LayoutOptions::default();
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let row = Row::from_pairs([("Notes", CellValue::text(text))]);
        let pages = layout_row(&row, 0, &opts).unwrap();

        let value = &pages[0].cells[1];
        assert!(value.lines.len() > 1);
        let limit = opts.value_column_width - 2.0 * opts.cell_padding_x;
        for line in &value.lines {
            assert!(FontFace::Regular.text_width(&line.text, opts.font_size) <= limit);
        }
    }

    #[test]
    fn test_accented_capitals_wrap_to_column() {
        let opts = LayoutOptions::default();
        let limit = opts.value_column_width - 2.0 * opts.cell_padding_x;
        let row = Row::from_pairs([("Name", CellValue::text("Ö".repeat(120)))]);
        let pages = layout_row(&row, 0, &opts).unwrap();

        // Helvetica Ö is 778/1000 em: 35 fit in 276 pt at 10 pt
        let lengths: Vec<usize> = pages[0].cells[1]
            .lines
            .iter()
            .map(|l| l.text.chars().count())
            .collect();
        assert_eq!(lengths, vec![35, 35, 35, 15]);
        for n in lengths {
            assert!(n as f32 * 7.78 <= limit);
        }

        let lines = wrap_text(&"ÆÇÌæ ".repeat(30), FontFace::Regular, 10.0, limit);
        for line in &lines {
            let afm: u32 = line
                .chars()
                .map(|c| match c {
                    'Æ' => 1000,
                    'Ç' => 722,
                    'Ì' => 278,
                    'æ' => 889,
                    ' ' => 278,
                    other => panic!("unexpected {other}"),
                })
                .sum();
            assert!(afm as f32 / 100.0 <= limit, "{line} is {afm} units wide");
        }
    }

    #[test]
    fn test_overflow_to_next_page() {
        let opts = LayoutOptions::default();
        let row = Row::from_pairs((0..80).map(|i| (format!("Field {}", i), CellValue::Number(i as f64))));
        let pages = layout_row(&row, 0, &opts).unwrap();

        assert!(pages.len() > 1);
        assert!(pages[1].title.is_none());
        let names = name_cells(&pages);
        assert_eq!(names.len(), 80);
        for (i, (idx, text)) in names.iter().enumerate() {
            assert_eq!(*idx, i);
            assert_eq!(text, &format!("Field {}", i));
        }
        for page in &pages {
            for cell in &page.cells {
                assert!(cell.top - cell.height >= opts.margins.bottom - 1e-3);
            }
        }
    }

    #[test]
    fn test_row_taller_than_page_is_split() {
        let opts = LayoutOptions::default();
        let text = (0..150).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let row = Row::from_pairs([("Log", CellValue::text(text))]);
        let pages = layout_row(&row, 0, &opts).unwrap();

        assert!(pages.len() >= 3);
        let rendered: Vec<String> = pages
            .iter()
            .flat_map(|p| &p.cells)
            .filter(|c| c.column == Column::Value)
            .flat_map(|c| c.lines.iter().map(|l| l.text.clone()))
            .collect();
        assert_eq!(rendered.len(), 150);
        assert_eq!(rendered[149], "line 149");
        assert_eq!(name_cells(&pages), vec![(0, "Log".to_string())]);
    }

    #[test]
    fn test_page_too_small() {
        let opts = LayoutOptions::new().with_page_size(595.0, 80.0);
        let result = layout_row(&staff_row(), 0, &opts);
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
