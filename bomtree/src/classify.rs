//! Part Classifier
//!
//! Pattern-based part typing, drawing-number extraction and duplicate
//! flagging. Everything except first-occurrence tracking is a pure function
//! of the row.

use std::collections::HashSet;

use crate::core::ResolveOptions;
use crate::model::{BomRow, FileKind, PartType};
use crate::pattern;

/// Type of a part from its number and file kind.
pub fn part_type(part_number: &str, kind: FileKind) -> PartType {
    match (pattern::is_dss(part_number), kind) {
        (true, FileKind::Part) => PartType::DssPart,
        (true, FileKind::Assembly) => PartType::DssAssy,
        (false, _) => PartType::Cots,
    }
}

/// Classify rows in input order.
///
/// The first occurrence of a part number is the canonical one; every later
/// occurrence is a duplicate and can never be the drawing instance.
pub fn classify(rows: Vec<BomRow>, options: &ResolveOptions) -> Vec<BomRow> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .map(|mut row| {
            row.part_type = part_type(&row.part_number, row.kind);
            row.drawing_number = pattern::drawing_number(&row.part_number).map(str::to_string);
            row.is_duplicate = !seen.insert(row.part_number.clone());
            row.is_drawing = !row.is_duplicate && pattern::is_dash_one(&row.part_number);
            if row.material.is_none() && row.is_assembly() {
                row.material = Some(options.assembly_material.clone());
            }
            row
        })
        .collect()
}
