//! Raw CSV grid I/O with encoding auto-detection.
//!
//! e-Stat extracts arrive as UTF-8 with a byte-order mark, but files
//! that passed through spreadsheets or older portals show up in
//! Shift_JIS or EUC-JP. Reading goes through chardet + encoding_rs so
//! the reshape never has to care; writing always produces UTF-8 with a
//! BOM so Excel opens the result with the right encoding.
//!
//! No header interpretation happens here. The grid keeps every row and
//! cell exactly as written, including the metadata preamble, because the
//! reshape addresses rows and columns by fixed offsets.

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// UTF-8 byte-order mark, stripped on read and prepended on write.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A CSV file as a plain grid of text cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// All rows, in file order, cells exactly as written.
    pub rows: Vec<Vec<String>>,
    /// Encoding the file was decoded from.
    pub encoding: String,
}

impl RawTable {
    /// Cell at (row, col), if the grid extends that far.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Detect the encoding of raw bytes.
///
/// A UTF-8 BOM short-circuits detection; otherwise chardet decides and
/// the charset name is normalized to an encoding_rs label.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(UTF8_BOM) {
        return "utf-8".to_string();
    }

    let (charset, _confidence, _) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "shift_jis" | "shift-jis" | "sjis" | "windows-31j" | "cp932" => "shift_jis".to_string(),
        "euc-jp" | "eucjp" => "euc-jp".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the given encoding label, stripping a UTF-8 BOM.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let label = encoding.trim();
    if label.is_empty() {
        return Err(CsvError::EncodingError(
            "could not detect a charset".to_string(),
        ));
    }

    match encoding_rs::Encoding::for_label(label.as_bytes()) {
        Some(enc) => Ok(enc.decode(bytes).0.into_owned()),
        None => Err(CsvError::EncodingError(format!(
            "unsupported charset '{}'",
            label
        ))),
    }
}

/// Read a CSV file into a [`RawTable`] with encoding auto-detection.
pub fn read_table<P: AsRef<Path>>(path: P) -> CsvResult<RawTable> {
    let bytes = fs::read(path.as_ref())?;
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding)?;
    let rows = parse_grid(&content)?;

    Ok(RawTable { rows, encoding })
}

/// Parse decoded CSV text into rows of cells.
///
/// Runs headerless and flexible: fixed-layout extracts mix metadata
/// rows of every width above the actual table.
pub fn parse_grid(content: &str) -> CsvResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Serialize records to a CSV file, UTF-8 with a leading BOM.
///
/// The header row comes from the record type's serde renames. Parent
/// directories are created as needed.
pub fn write_csv_with_bom<P, S>(path: P, records: &[S]) -> CsvResult<()>
where
    P: AsRef<Path>,
    S: Serialize,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
