//! Parent-Chain Resolver
//!
//! Fills `used_on` and the full ancestor list of every row once parent links
//! are known.

use std::collections::HashMap;

use crate::core::BomError;
use crate::model::BomRow;

/// Resolve `used_on` and `parent_chain` for every row.
///
/// Walks are bounded by the row count. A walk that runs longer, or a
/// `parent_id` that names no row, means the links are corrupted and fails
/// with [`BomError::Cycle`].
pub fn resolve_parent_chains(rows: Vec<BomRow>) -> Result<Vec<BomRow>, BomError> {
    let position: HashMap<usize, usize> = rows
        .iter()
        .enumerate()
        .map(|(pos, r)| (r.unique_id, pos))
        .collect();

    let mut resolved: Vec<(Option<String>, Vec<usize>)> = Vec::with_capacity(rows.len());
    for row in &rows {
        let chain = walk_chain(row, &rows, &position)?;
        let used_on = row
            .parent_id
            .and_then(|id| position.get(&id))
            .map(|&pos| rows[pos].part_number.clone());
        resolved.push((used_on, chain));
    }

    Ok(rows
        .into_iter()
        .zip(resolved)
        .map(|(mut row, (used_on, chain))| {
            row.used_on = used_on;
            row.parent_chain = chain;
            row
        })
        .collect())
}

fn walk_chain(
    row: &BomRow,
    rows: &[BomRow],
    position: &HashMap<usize, usize>,
) -> Result<Vec<usize>, BomError> {
    let cycle = || BomError::Cycle {
        unique_id: row.unique_id,
    };
    let mut chain = Vec::with_capacity(row.depth);
    let mut next = row.parent_id;
    while let Some(parent_id) = next {
        if chain.len() >= rows.len() {
            return Err(cycle());
        }
        let pos = *position.get(&parent_id).ok_or_else(cycle)?;
        chain.push(parent_id);
        next = rows[pos].parent_id;
    }
    Ok(chain)
}
