//! Row Normalizer
//!
//! Turns raw export records into [`BomRow`]s: drops non-CAD files, assigns
//! unique ids over the retained rows and derives the canonical part number
//! from the file name, configuration and override columns.

use crate::core::{BomError, ResolveOptions};
use crate::model::{BomRow, FileKind, PartDetails, MAX_QTY};
use crate::pattern::trim_after_dash_number;
use crate::table::{columns, Record, RecordTable};

/// Normalize every record of `table`.
///
/// Fails with [`BomError::Schema`] when a required column is absent.
pub fn normalize(table: &RecordTable, options: &ResolveOptions) -> Result<Vec<BomRow>, BomError> {
    let mut required = vec![
        columns::NAME,
        columns::CONFIGURATION,
        columns::PART_NUM_OVERRIDE,
    ];
    if options.require_level_column {
        required.push(columns::LEVEL);
    }
    let missing = table.missing_columns(&required);
    if !missing.is_empty() {
        return Err(BomError::Schema { missing });
    }
    if !table.has_column(columns::LEVEL) {
        tracing::warn!("Export has no Level column; every row is treated as a top-level item");
    }

    let mut rows = Vec::with_capacity(table.len());
    let mut dropped = 0usize;
    for record in table.records() {
        let (file_name, extension) = split_file_name(record.raw(columns::NAME).unwrap_or(""));
        let kind = match file_kind(&extension, options) {
            Some(kind) => kind,
            None => {
                tracing::debug!("Skipping non-CAD file {}.{}", file_name, extension);
                dropped += 1;
                continue;
            }
        };

        let unique_id = rows.len();
        let part_number = derive_part_number(&record, &file_name, options);
        let qty = parse_qty(record.get(columns::QTY), unique_id)?;
        let level = record.get(columns::LEVEL).unwrap_or("");

        let mut row = BomRow::new(unique_id, level, file_name, kind, part_number, qty);
        row.material = record.get_owned(columns::MATERIAL);
        row.details = read_details(&record);
        rows.push(row);
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} non-CAD rows", dropped);
    }
    Ok(rows)
}

/// Uppercase, trim and split on the last '.'; no '.' means no extension.
pub fn split_file_name(name: &str) -> (String, String) {
    let name = name.trim().to_uppercase();
    match name.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), ext.to_string()),
        None => (name, String::new()),
    }
}

fn file_kind(extension: &str, options: &ResolveOptions) -> Option<FileKind> {
    if extension.eq_ignore_ascii_case(&options.part_extension) {
        Some(FileKind::Part)
    } else if extension.eq_ignore_ascii_case(&options.assembly_extension) {
        Some(FileKind::Assembly)
    } else {
        None
    }
}

fn derive_part_number(record: &Record<'_>, file_name: &str, options: &ResolveOptions) -> String {
    let part_number = match (
        record.get(columns::PART_NUM_OVERRIDE),
        record.get(columns::CONFIGURATION),
    ) {
        (Some(part_override), _) => part_override.to_string(),
        (None, None) => file_name.to_string(),
        (None, Some(config)) if config.eq_ignore_ascii_case(&options.no_config_token) => {
            file_name.to_string()
        }
        (None, Some(config)) => format!("{}{}", file_name, config),
    };
    trim_after_dash_number(&part_number).to_string()
}

/// Per-instance quantity; blank means 1.
///
/// Whole-valued decimals ("2.0") are accepted since spreadsheet round trips
/// produce them. Negative or fractional values are rejected.
pub fn parse_qty(raw: Option<&str>, unique_id: usize) -> Result<u64, BomError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(1);
    };
    let invalid = || BomError::Quantity {
        unique_id,
        value: raw.to_string(),
    };
    if let Ok(qty) = raw.parse::<u64>() {
        return if qty <= MAX_QTY { Ok(qty) } else { Err(invalid()) };
    }
    let value: f64 = raw.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= MAX_QTY as f64 {
        return Err(invalid());
    }
    Ok(value as u64)
}

fn read_details(record: &Record<'_>) -> PartDetails {
    PartDetails {
        description: record.get_owned(columns::DESCRIPTION),
        cage_code: record.get_owned(columns::CAGE_CODE),
        revision: record.get_owned(columns::REVISION),
        weight: record.get_owned(columns::WEIGHT),
        finish_1: record.get_owned(columns::FINISH_1),
        finish_2: record.get_owned(columns::FINISH_2),
        finish_3: record.get_owned(columns::FINISH_3),
        state: record.get_owned(columns::STATE),
        latest_version: record.get_owned(columns::LATEST_VERSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &[&str] = &["Name", "Configuration", "PartNumOverride", "Level", "QTY"];

    fn normalize_rows(rows: &[&[&str]]) -> Vec<BomRow> {
        let table = RecordTable::from_rows(HEADERS, rows);
        normalize(&table, &ResolveOptions::default()).unwrap()
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(
            split_file_name("  bracket.v2.sldprt "),
            ("BRACKET.V2".to_string(), "SLDPRT".to_string())
        );
        assert_eq!(split_file_name("README"), ("README".to_string(), String::new()));
    }

    #[test]
    fn test_drops_non_cad_and_renumbers() {
        let rows = normalize_rows(&[
            &["TOP.SLDASM", "", "", "", ""],
            &["TOP.SLDDRW", "", "", "1", ""],
            &["PSELF.DF", "", "", "2", ""],
            &["BOLT.sldprt", "", "", "3", ""],
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unique_id, 0);
        assert_eq!(rows[1].unique_id, 1);
        assert_eq!(rows[1].part_number, "BOLT");
        assert_eq!(rows[1].kind, FileKind::Part);
        assert_eq!(rows[1].raw_level, "3");
    }

    #[test]
    fn test_part_number_rules() {
        let rows = normalize_rows(&[
            &["123F4567.SLDPRT", "-1", "", "", ""],
            &["123F4567.SLDPRT", "NoConfig", "", "", ""],
            &["123F4567.SLDPRT", "Default", "999X0001-3", "", ""],
            &["123F4567.SLDPRT", "-100-DEPLOYED", "", "", ""],
            &["WASHER.SLDPRT", "", "", "", ""],
        ]);
        assert_eq!(rows[0].part_number, "123F4567-1");
        assert_eq!(rows[1].part_number, "123F4567");
        assert_eq!(rows[2].part_number, "999X0001-3");
        assert_eq!(rows[3].part_number, "123F4567-100");
        assert_eq!(rows[4].part_number, "WASHER");
    }

    #[test]
    fn test_schema_error_lists_missing() {
        let table = RecordTable::from_rows(&["Name", "QTY"], &[]);
        let err = normalize(&table, &ResolveOptions::default()).unwrap_err();
        match err {
            BomError::Schema { missing } => {
                assert_eq!(missing, vec!["Configuration", "PartNumOverride", "Level"]);
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_level_column_allowed() {
        let table = RecordTable::from_rows(
            &["Name", "Configuration", "PartNumOverride"],
            &[&["A.SLDPRT", "", ""], &["B.SLDPRT", "", ""]],
        );
        let options = ResolveOptions {
            require_level_column: false,
            ..ResolveOptions::default()
        };
        let rows = normalize(&table, &options).unwrap();
        assert!(rows.iter().all(|r| r.raw_level.is_empty()));
    }

    #[test]
    fn test_parse_qty() {
        assert_eq!(parse_qty(None, 0).unwrap(), 1);
        assert_eq!(parse_qty(Some("  "), 0).unwrap(), 1);
        assert_eq!(parse_qty(Some("4"), 0).unwrap(), 4);
        assert_eq!(parse_qty(Some("2.0"), 0).unwrap(), 2);
        assert_eq!(parse_qty(Some("0"), 0).unwrap(), 0);
        assert!(matches!(
            parse_qty(Some("-2"), 5),
            Err(BomError::Quantity { unique_id: 5, .. })
        ));
        assert!(parse_qty(Some("1.5"), 0).is_err());
        assert!(parse_qty(Some("lots"), 0).is_err());
        assert_eq!(
            parse_qty(Some("9223372036854775807"), 0).unwrap(),
            MAX_QTY
        );
        assert!(parse_qty(Some("9223372036854775808"), 0).is_err());
    }

    #[test]
    fn test_qty_error_reports_row() {
        let table = RecordTable::from_rows(HEADERS, &[&["A.SLDASM", "", "", "", "x"]]);
        let err = normalize(&table, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, BomError::Quantity { unique_id: 0, .. }));
    }
}
