//! Quantity Rollup Engine
//!
//! `total_qty = qty x qty(parent) x qty(grandparent) x ...` over the whole
//! parent chain, top item included.

use std::collections::HashMap;

use crate::core::BomError;
use crate::model::{checked_qty_mul, BomRow, MAX_QTY};

/// Compute `total_qty` for every row.
///
/// Requires resolved parent chains. Multiplication is checked; a total past
/// [`MAX_QTY`] fails with [`BomError::Overflow`] instead of wrapping.
pub fn rollup_quantities(rows: Vec<BomRow>) -> Result<Vec<BomRow>, BomError> {
    let qty_by_id: HashMap<usize, u64> = rows.iter().map(|r| (r.unique_id, r.qty)).collect();

    rows.into_iter()
        .map(|mut row| {
            row.total_qty = total_qty(&row, &qty_by_id)?;
            Ok(row)
        })
        .collect()
}

fn total_qty(row: &BomRow, qty_by_id: &HashMap<usize, u64>) -> Result<u64, BomError> {
    let overflow = || BomError::Overflow {
        unique_id: row.unique_id,
        part_number: row.part_number.clone(),
    };
    if row.qty > MAX_QTY {
        return Err(overflow());
    }
    row.parent_chain.iter().try_fold(row.qty, |total, id| {
        let qty = qty_by_id.get(id).copied().ok_or(BomError::Cycle {
            unique_id: row.unique_id,
        })?;
        checked_qty_mul(total, qty).ok_or_else(overflow)
    })
}
