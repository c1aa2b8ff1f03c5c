//! Synthetic workbooks for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use lopdf::{Document, Object};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds a minimal XLSX package in memory.
///
/// Cells that parse as numbers are written as numeric cells, other text goes
/// to the shared string table and empty strings are left out of the sheet.
#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        let mut shared: Vec<String> = Vec::new();
        let mut worksheets = Vec::new();
        for (_, rows) in &self.sheets {
            worksheets.push(worksheet_xml(rows, &mut shared));
        }

        let mut overrides = String::new();
        let mut sheet_entries = String::new();
        let mut sheet_rels = String::new();
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                escape(name)
            ));
            sheet_rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }
        let strings_rel_id = self.sheets.len() + 1;

        write_part(
            &mut zip,
            options,
            "[Content_Types].xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
  {overrides}
</Types>"#
            ),
        );

        write_part(
            &mut zip,
            options,
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        );

        write_part(
            &mut zip,
            options,
            "xl/workbook.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>{sheet_entries}</sheets>
</workbook>"#
            ),
        );

        write_part(
            &mut zip,
            options,
            "xl/_rels/workbook.xml.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  {sheet_rels}
  <Relationship Id="rId{strings_rel_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#
            ),
        );

        let items: String = shared
            .iter()
            .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(s)))
            .collect();
        write_part(
            &mut zip,
            options,
            "xl/sharedStrings.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{items}</sst>"#,
                shared.len()
            ),
        );

        for (i, xml) in worksheets.iter().enumerate() {
            write_part(
                &mut zip,
                options,
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                xml,
            );
        }

        zip.finish().unwrap();
        buffer
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

fn write_part(
    zip: &mut ZipWriter<Cursor<&mut Vec<u8>>>,
    options: SimpleFileOptions,
    name: &str,
    content: &str,
) {
    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
}

fn worksheet_xml(rows: &[Vec<String>], shared: &mut Vec<String>) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        data.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = format!("{}{}", column_letters(c), r + 1);
            if value.parse::<f64>().is_ok() {
                data.push_str(&format!("<c r=\"{reference}\"><v>{value}</v></c>"));
            } else {
                let index = match shared.iter().position(|s| s == value) {
                    Some(i) => i,
                    None => {
                        shared.push(value.clone());
                        shared.len() - 1
                    }
                };
                data.push_str(&format!("<c r=\"{reference}\" t=\"s\"><v>{index}</v></c>"));
            }
        }
        data.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>{data}</sheetData>
</worksheet>"#
    )
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strings drawn with `Tj`, page by page.
pub fn pdf_text(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_and_decode_page_content(page_id).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        // WinAnsi is Latin-1 for the characters used in tests
                        Some(bytes.iter().map(|&b| b as char).collect())
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Sorted file names in a directory.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
