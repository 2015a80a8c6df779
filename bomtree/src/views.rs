//! Derived views over a resolved BOM
//!
//! - part summary: one line per part number with summed quantity and mass
//! - drawing list: one line per drawing number
//! - shipset requirements: part summary scaled by a number of shipsets

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::core::{BomError, ResolvedBom};
use crate::model::{checked_qty_add, checked_qty_mul, PartType};

/// One part number across the whole tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSummary {
    /// Unique id of the first occurrence.
    #[serde(skip)]
    pub first_row: usize,
    pub part_number: String,
    pub part_type: PartType,
    pub description: Option<String>,
    pub cage_code: Option<String>,
    pub revision: Option<String>,
    pub material: Option<String>,
    pub finish_1: Option<String>,
    pub finish_2: Option<String>,
    pub finish_3: Option<String>,
    pub total_qty: u64,
    pub weight: f64,
    pub total_weight: f64,
}

/// One released drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawingEntry {
    pub drawing_number: String,
    pub description: Option<String>,
    pub state: Option<String>,
    pub revision: Option<String>,
    pub latest_version: Option<String>,
}

/// Quantity needed to build a number of shipsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipsetRequirement {
    pub part_number: String,
    pub revision: Option<String>,
    pub description: Option<String>,
    pub cage_code: Option<String>,
    pub assembly_qty: u64,
    pub shipset_qty: u64,
}

/// Group rows by part number, in order of first appearance.
///
/// Quantities are summed over every occurrence; descriptive fields come from
/// the first occurrence.
pub fn part_summary(bom: &ResolvedBom) -> Result<Vec<PartSummary>, BomError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut parts: Vec<PartSummary> = Vec::new();

    for row in &bom.rows {
        match index.get(row.part_number.as_str()) {
            Some(&i) => {
                let part = &mut parts[i];
                part.total_qty = checked_qty_add(part.total_qty, row.total_qty)
                    .ok_or_else(|| BomError::Overflow {
                        unique_id: row.unique_id,
                        part_number: row.part_number.clone(),
                    })?;
            }
            None => {
                index.insert(row.part_number.as_str(), parts.len());
                parts.push(PartSummary {
                    first_row: row.unique_id,
                    part_number: row.part_number.clone(),
                    part_type: row.part_type,
                    description: row.details.description.clone(),
                    cage_code: row.details.cage_code.clone(),
                    revision: row.details.revision.clone(),
                    material: row.material.clone(),
                    finish_1: row.details.finish_1.clone(),
                    finish_2: row.details.finish_2.clone(),
                    finish_3: row.details.finish_3.clone(),
                    total_qty: row.total_qty,
                    weight: row.details.weight_value(),
                    total_weight: 0.0,
                });
            }
        }
    }

    for part in &mut parts {
        part.total_weight = part.weight * part.total_qty as f64;
    }
    Ok(parts)
}

/// Unique drawing numbers, sorted.
pub fn drawing_list(bom: &ResolvedBom) -> Vec<DrawingEntry> {
    let mut seen = HashSet::new();
    let mut drawings: Vec<DrawingEntry> = bom
        .rows
        .iter()
        .filter_map(|row| {
            let number = row.drawing_number.as_ref()?;
            if !seen.insert(number.as_str()) {
                return None;
            }
            Some(DrawingEntry {
                drawing_number: number.clone(),
                description: row.details.description.clone(),
                state: row.details.state.clone(),
                revision: row.details.revision.clone(),
                latest_version: row.details.latest_version.clone(),
            })
        })
        .collect();
    drawings.sort_by(|a, b| a.drawing_number.cmp(&b.drawing_number));
    drawings
}

/// Scale the part summary by `shipsets`.
pub fn shipset_requirements(
    bom: &ResolvedBom,
    shipsets: u64,
) -> Result<Vec<ShipsetRequirement>, BomError> {
    part_summary(bom)?
        .into_iter()
        .map(|part| {
            let shipset_qty = checked_qty_mul(part.total_qty, shipsets)
                .ok_or_else(|| BomError::Overflow {
                    unique_id: part.first_row,
                    part_number: part.part_number.clone(),
                })?;
            Ok(ShipsetRequirement {
                part_number: part.part_number,
                revision: part.revision,
                description: part.description,
                cage_code: part.cage_code,
                assembly_qty: part.total_qty,
                shipset_qty,
            })
        })
        .collect()
}
