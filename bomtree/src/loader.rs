//! CSV loader for PDM BOM exports
//!
//! PDM writes its BOM exports as UTF-16 with a byte-order mark; hand-edited
//! files are usually UTF-8. Both are accepted. Unreadable lines are skipped
//! with a warning rather than failing the whole file.

use std::path::Path;

use crate::core::BomError;
use crate::table::RecordTable;

/// Load a CSV export from disk.
pub fn load_csv_path(path: &Path) -> Result<RecordTable, BomError> {
    let is_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(BomError::Load(format!(
            "Not a CSV file: {}",
            path.display()
        )));
    }
    let data = std::fs::read(path)?;
    tracing::info!("Loading BOM export {} ({} bytes)", path.display(), data.len());
    load_csv_bytes(&data)
}

/// Load a CSV export from raw bytes, detecting UTF-8/UTF-16 by byte-order mark.
pub fn load_csv_bytes(data: &[u8]) -> Result<RecordTable, BomError> {
    let text = decode(data)?;
    load_csv_str(&text)
}

/// Load a CSV export from text.
pub fn load_csv_str(text: &str) -> Result<RecordTable, BomError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();
    let mut table = RecordTable::new(headers);

    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            // short rows are padded; long rows have misaligned columns
            Ok(record) if record.len() > width => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!(
                    "Skipping CSV line {}: {} fields, header has {}",
                    line,
                    record.len(),
                    width
                );
                skipped += 1;
            }
            Ok(record) => table.push_row(record.iter().map(str::to_string).collect()),
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV line: {}", e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {} malformed CSV lines", skipped);
    }
    tracing::debug!("Loaded {} records with {} columns", table.len(), table.headers().len());
    Ok(table)
}

fn decode(data: &[u8]) -> Result<String, BomError> {
    match data {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        _ => decode_utf8(data),
    }
}

fn decode_utf8(data: &[u8]) -> Result<String, BomError> {
    String::from_utf8(data.to_vec()).map_err(|e| BomError::Load(format!("Invalid UTF-8: {}", e)))
}

fn decode_utf16(data: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String, BomError> {
    if data.len() % 2 != 0 {
        return Err(BomError::Load(
            "UTF-16 data has an odd number of bytes".to_string(),
        ));
    }
    let units = data.chunks_exact(2).map(|c| from_bytes([c[0], c[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| BomError::Load(format!("Invalid UTF-16: {}", e)))
}
