//! Plain-data exporters for resolved BOMs
//!
//! The output table covers every [`BomRow`] field under the column names the
//! spreadsheet reports use. Styling and sheet layout belong to downstream
//! tools; this module only writes CSV and JSON.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::{BomError, ResolvedBom};
use crate::model::{BomRow, PartType};

/// One row of the exported table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Unique ID")]
    pub unique_id: usize,
    #[serde(rename = "Parent ID")]
    pub parent_id: Option<usize>,
    #[serde(rename = "Parent List")]
    pub parent_list: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Depth")]
    pub depth: usize,
    #[serde(rename = "Type")]
    pub part_type: PartType,
    #[serde(rename = "Part Number")]
    pub part_number: String,
    #[serde(rename = "Used On")]
    pub used_on: Option<String>,
    #[serde(rename = "QTY")]
    pub qty: u64,
    #[serde(rename = "Total QTY")]
    pub total_qty: u64,
    #[serde(rename = "Drawing")]
    pub drawing: &'static str,
    #[serde(rename = "Duplicate")]
    pub duplicate: &'static str,
    #[serde(rename = "Drawing Number")]
    pub drawing_number: Option<String>,
    #[serde(rename = "Material")]
    pub material: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Cage Code")]
    pub cage_code: Option<String>,
    #[serde(rename = "Revision")]
    pub revision: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<String>,
    #[serde(rename = "Finish 1")]
    pub finish_1: Option<String>,
    #[serde(rename = "Finish 2")]
    pub finish_2: Option<String>,
    #[serde(rename = "Finish 3")]
    pub finish_3: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Latest Version")]
    pub latest_version: Option<String>,
}

fn yes(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        ""
    }
}

impl From<&BomRow> for OutputRow {
    fn from(row: &BomRow) -> Self {
        let parent_list = row
            .parent_chain
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            unique_id: row.unique_id,
            parent_id: row.parent_id,
            parent_list,
            level: row.new_level.clone(),
            depth: row.depth,
            part_type: row.part_type,
            part_number: row.part_number.clone(),
            used_on: row.used_on.clone(),
            qty: row.qty,
            total_qty: row.total_qty,
            drawing: yes(row.is_drawing),
            duplicate: yes(row.is_duplicate),
            drawing_number: row.drawing_number.clone(),
            material: row.material.clone(),
            description: row.details.description.clone(),
            cage_code: row.details.cage_code.clone(),
            revision: row.details.revision.clone(),
            weight: row.details.weight.clone(),
            finish_1: row.details.finish_1.clone(),
            finish_2: row.details.finish_2.clone(),
            finish_3: row.details.finish_3.clone(),
            state: row.details.state.clone(),
            latest_version: row.details.latest_version.clone(),
        }
    }
}

/// Output table in resolved (depth-first) order.
pub fn output_rows(bom: &ResolvedBom) -> Vec<OutputRow> {
    bom.rows.iter().map(OutputRow::from).collect()
}

/// Write any serializable records as CSV with a header row.
pub fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<(), BomError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the full output table as CSV.
pub fn write_bom_csv<W: Write>(writer: W, bom: &ResolvedBom) -> Result<(), BomError> {
    write_csv(writer, &output_rows(bom))
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    source: Option<String>,
    stats: &'a crate::core::ResolveStats,
    rows: Vec<OutputRow>,
}

/// Write the resolved BOM as pretty JSON.
///
/// Rows use the same column names as the CSV table.
pub fn write_bom_json<W: Write>(writer: W, bom: &ResolvedBom) -> Result<(), BomError> {
    let document = JsonDocument {
        source: bom.source.as_ref().map(|p| p.display().to_string()),
        stats: &bom.stats,
        rows: output_rows(bom),
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Default export file name: `<YYYYMMDD> <assembly>.<extension>`.
///
/// The date is the source file's modification time; the assembly number is
/// the export file name up to its first '.', so `1234567.SLDASM.1.BOM.csv`
/// gives `20240131 1234567.csv`.
pub fn default_export_name(source: &Path, extension: &str) -> Result<String, BomError> {
    let modified = std::fs::metadata(source)?.modified()?;
    let date = DateTime::<Local>::from(modified).format("%Y%m%d");
    let assembly = source
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|n| !n.is_empty())
        .unwrap_or("bom");
    Ok(format!("{} {}.{}", date, assembly, extension))
}
