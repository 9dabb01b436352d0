//! CSV and XLSX export of the filtered row set.
//!
//! Export always covers the filtered-but-unpaginated rows and only the
//! allow-listed fields. Each value is stringified the same way cells are
//! rendered. An empty row set produces a notice instead of a file.
//!
//! XLSX output is a minimal single-sheet workbook written with inline
//! strings, so no shared-string table or styles part is needed.

use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula_seeker::Record;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::notice::Notice;

/// Errors that can occur while producing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no export fields are configured")]
    NoFields,

    #[error("unknown export format '{0}' (expected csv or xlsx)")]
    UnknownFormat(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX export failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// The fixed download name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "data.csv",
            ExportFormat::Xlsx => "data.xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// One exported column: the row field and its header text.
///
/// Deserializes from a bare field name or from `{field, header}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSpec")]
pub struct ExportField {
    pub field: String,
    pub header: String,
}

impl ExportField {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        ExportField {
            header: field.clone(),
            field,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpec {
    Plain(String),
    Full {
        field: String,
        #[serde(default)]
        header: Option<String>,
    },
}

impl From<FieldSpec> for ExportField {
    fn from(spec: FieldSpec) -> Self {
        match spec {
            FieldSpec::Plain(field) => ExportField::new(field),
            FieldSpec::Full { field, header } => {
                let export = ExportField::new(field);
                match header {
                    Some(header) => export.header(header),
                    None => export,
                }
            }
        }
    }
}

/// A finished export, ready to be offered as a download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

impl ExportFile {
    /// Writes the file into `dir` under its fixed name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("wrote {} rows to {}", self.row_count, path.display());
        Ok(path)
    }
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    File(ExportFile),
    /// Nothing to export; show the notice, produce no file.
    NoData(Notice),
}

impl ExportOutcome {
    pub fn file(&self) -> Option<&ExportFile> {
        match self {
            ExportOutcome::File(file) => Some(file),
            ExportOutcome::NoData(_) => None,
        }
    }
}

/// Exports `rows` restricted to `fields`.
pub fn export_rows<T: Record>(
    rows: &[&T],
    fields: &[ExportField],
    format: ExportFormat,
) -> Result<ExportOutcome, ExportError> {
    if fields.is_empty() {
        return Err(ExportError::NoFields);
    }
    if rows.is_empty() {
        log::debug!("export skipped: filtered set is empty");
        return Ok(ExportOutcome::NoData(Notice::warning("No data to export")));
    }

    let headers: Vec<&str> = fields.iter().map(|f| f.header.as_str()).collect();
    let records: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            fields
                .iter()
                .map(|f| row.field(&f.field).to_text().into_owned())
                .collect()
        })
        .collect();

    let bytes = match format {
        ExportFormat::Csv => write_csv(&headers, &records)?,
        ExportFormat::Xlsx => write_xlsx(&headers, &records)?,
    };

    Ok(ExportOutcome::File(ExportFile {
        format,
        file_name: format.file_name().to_string(),
        bytes,
        row_count: records.len(),
    }))
}

// ============================================================================
// CSV
// ============================================================================

fn write_csv(headers: &[&str], records: &[Vec<String>]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for record in records {
        wtr.write_record(record)?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

// ============================================================================
// XLSX
// ============================================================================

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn write_xlsx(headers: &[&str], records: &[Vec<String>]) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(headers, records)),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn sheet_xml(headers: &[&str], records: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let header_row = headers.iter().copied();
    push_row(&mut xml, 1, header_row);
    for (i, record) in records.iter().enumerate() {
        push_row(&mut xml, i + 2, record.iter().map(String::as_str));
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, row: usize, cells: impl Iterator<Item = &'a str>) {
    xml.push_str(&format!(r#"<row r="{}">"#, row));
    for (col, text) in cells.enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(col),
            row,
            quick_xml::escape::escape(&*xml_chars(text))
        ));
    }
    xml.push_str("</row>");
}

/// Drops characters XML 1.0 cannot carry: C0 controls other than tab, LF
/// and CR, plus U+FFFE and U+FFFF.
fn xml_chars(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        !matches!(
            c,
            '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
        )
    }
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

/// Spreadsheet column letters for a 0-based index: A..Z, AA..AZ, ...
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
