//! BOM row data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Part classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartType {
    /// Proprietary part file
    #[serde(rename = "DSS PART")]
    DssPart,
    /// Proprietary assembly file
    #[serde(rename = "DSS ASSY")]
    DssAssy,
    /// Commercial off-the-shelf item
    #[serde(rename = "COTS")]
    Cots,
}

impl PartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::DssPart => "DSS PART",
            PartType::DssAssy => "DSS ASSY",
            PartType::Cots => "COTS",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CAD file kind, from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Part,
    Assembly,
}

/// Descriptive columns carried through from the export untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartDetails {
    pub description: Option<String>,
    pub cage_code: Option<String>,
    pub revision: Option<String>,
    pub weight: Option<String>,
    pub finish_1: Option<String>,
    pub finish_2: Option<String>,
    pub finish_3: Option<String>,
    pub state: Option<String>,
    pub latest_version: Option<String>,
}

impl PartDetails {
    /// Weight as a number; blank or non-numeric weights count as zero.
    pub fn weight_value(&self) -> f64 {
        self.weight
            .as_deref()
            .and_then(|w| w.trim().parse::<f64>().ok())
            .filter(|w| w.is_finite())
            .unwrap_or(0.0)
    }
}

/// Largest quantity any row, rollup or summary may hold.
///
/// Quantities are unsigned but bounded like the signed 64-bit integer
/// columns of the spreadsheet reports.
pub const MAX_QTY: u64 = i64::MAX as u64;

/// Multiply two quantities, `None` past [`MAX_QTY`].
pub fn checked_qty_mul(a: u64, b: u64) -> Option<u64> {
    a.checked_mul(b).filter(|v| *v <= MAX_QTY)
}

/// Add two quantities, `None` past [`MAX_QTY`].
pub fn checked_qty_add(a: u64, b: u64) -> Option<u64> {
    a.checked_add(b).filter(|v| *v <= MAX_QTY)
}

/// One eligible row of the BOM, enriched phase by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomRow {
    /// Position among retained input rows; never changes.
    pub unique_id: usize,
    /// Level path as exported ("" for the top item).
    pub raw_level: String,
    /// Re-sequenced level path.
    pub new_level: String,
    pub depth: usize,
    /// Uppercased file name without extension.
    pub file_name: String,
    pub kind: FileKind,
    pub part_number: String,
    pub part_type: PartType,
    pub drawing_number: Option<String>,
    pub is_drawing: bool,
    pub is_duplicate: bool,
    pub parent_id: Option<usize>,
    /// Part number of the direct parent.
    pub used_on: Option<String>,
    /// Ancestor ids, immediate parent first.
    pub parent_chain: Vec<usize>,
    pub qty: u64,
    pub total_qty: u64,
    pub material: Option<String>,
    pub details: PartDetails,
}

impl BomRow {
    /// A freshly normalized row; tree and rollup fields are filled by later phases.
    pub fn new(
        unique_id: usize,
        raw_level: impl Into<String>,
        file_name: impl Into<String>,
        kind: FileKind,
        part_number: impl Into<String>,
        qty: u64,
    ) -> Self {
        Self {
            unique_id,
            raw_level: raw_level.into(),
            new_level: String::new(),
            depth: 0,
            file_name: file_name.into(),
            kind,
            part_number: part_number.into(),
            part_type: PartType::Cots,
            drawing_number: None,
            is_drawing: false,
            is_duplicate: false,
            parent_id: None,
            used_on: None,
            parent_chain: Vec::new(),
            qty,
            total_qty: qty,
            material: None,
            details: PartDetails::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_assembly(&self) -> bool {
        self.kind == FileKind::Assembly
    }
}
