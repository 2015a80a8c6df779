//! Level Resolver & Tree Rebuilder
//!
//! PDM level paths are often sparse or out of order ("1", "3", "3.7", "2").
//! This module links every row to its parent through the level path, sorts
//! each sibling group by part number and hands out contiguous level strings
//! in depth-first pre-order, which is how a BOM is read.
//!
//! Two level schemes show up in exports:
//!
//! - **Rooted**: the top assembly is exported with an empty level and every
//!   other path is relative to it. "1" is a child of the top item and
//!   "1.3.2" sits three levels down.
//! - **Absolute**: no row has an empty level; single-segment paths are the
//!   top-level items and depth is the number of separators. Resolved output
//!   ("1", "1.1", ...) is in this scheme, so it can be fed back unchanged.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::core::BomError;
use crate::model::BomRow;

/// How level paths relate to the top of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelScheme {
    /// An empty-level row exists and all other paths hang below it.
    Rooted,
    /// Single-segment paths are top-level items.
    Absolute,
}

impl LevelScheme {
    /// Rooted as soon as any row carries an empty level.
    pub fn detect(rows: &[BomRow]) -> Self {
        if rows.iter().any(|r| r.raw_level.is_empty()) {
            LevelScheme::Rooted
        } else {
            LevelScheme::Absolute
        }
    }

    /// Depth of a level path: separators, plus one below an empty-level top item.
    pub fn depth(&self, level: &str) -> usize {
        if level.is_empty() {
            return 0;
        }
        let separators = level.matches('.').count();
        match self {
            LevelScheme::Rooted => separators + 1,
            LevelScheme::Absolute => separators,
        }
    }
}

/// Level path of the parent: the path without its final segment.
pub fn parent_level(level: &str) -> &str {
    level.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("")
}

/// Rebuild the tree from raw level paths.
///
/// Returns the rows in depth-first order with `depth`, `parent_id` and
/// `new_level` filled in. A non-root row whose parent path matches no row
/// (or whose path has empty segments) fails with [`BomError::Integrity`].
/// When several rows share a level string the first one in input order is
/// taken as the parent.
pub fn resolve_levels(rows: Vec<BomRow>) -> Result<Vec<BomRow>, BomError> {
    let scheme = LevelScheme::detect(&rows);
    let parents = link_parents(&rows, scheme)?;

    // Sibling groups in input order, then stable-sorted by part number.
    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    for (pos, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(pos),
            None => roots.push(pos),
        }
    }
    let by_part_number = |a: &usize, b: &usize| rows[*a].part_number.cmp(&rows[*b].part_number);
    roots.sort_by(by_part_number);
    for group in &mut children {
        group.sort_by(by_part_number);
    }

    // Pre-order walk; each sibling group lands right after its parent.
    let mut order: Vec<(usize, String)> = Vec::with_capacity(rows.len());
    let mut stack: Vec<(usize, String)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &pos)| (pos, (i + 1).to_string()))
        .collect();
    while let Some((pos, new_level)) = stack.pop() {
        for (i, &child) in children[pos].iter().enumerate().rev() {
            stack.push((child, format!("{}.{}", new_level, i + 1)));
        }
        order.push((pos, new_level));
    }

    let ids: Vec<usize> = rows.iter().map(|r| r.unique_id).collect();
    let mut slots: Vec<Option<BomRow>> = rows.into_iter().map(Some).collect();
    let mut resolved = Vec::with_capacity(slots.len());
    for (pos, new_level) in order {
        if let Some(mut row) = slots[pos].take() {
            row.depth = scheme.depth(&row.raw_level);
            row.new_level = new_level;
            row.parent_id = parents[pos].map(|p| ids[p]);
            resolved.push(row);
        }
    }

    tracing::debug!(
        "Rebuilt levels for {} rows under {} top-level items ({:?} levels)",
        resolved.len(),
        roots.len(),
        scheme
    );
    Ok(resolved)
}

/// Parent position of every row, via a level-string index.
fn link_parents(rows: &[BomRow], scheme: LevelScheme) -> Result<Vec<Option<usize>>, BomError> {
    let mut by_level: HashMap<&str, usize> = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        match by_level.entry(row.raw_level.as_str()) {
            Entry::Vacant(e) => {
                e.insert(pos);
            }
            Entry::Occupied(_) if !row.raw_level.is_empty() => {
                tracing::debug!("Level '{}' appears more than once", row.raw_level);
            }
            Entry::Occupied(_) => {}
        }
    }

    rows.iter()
        .map(|row| {
            if row.raw_level.is_empty() {
                return Ok(None);
            }
            let orphan = || BomError::Integrity {
                unique_id: row.unique_id,
                raw_level: row.raw_level.clone(),
            };
            if row.raw_level.split('.').any(|s| s.trim().is_empty()) {
                return Err(orphan());
            }
            if scheme.depth(&row.raw_level) == 0 {
                return Ok(None);
            }
            by_level
                .get(parent_level(&row.raw_level))
                .map(|&p| Some(p))
                .ok_or_else(orphan)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;

    fn row(id: usize, level: &str, part_number: &str) -> BomRow {
        BomRow::new(id, level, part_number, FileKind::Part, part_number, 1)
    }

    fn summary(rows: &[BomRow]) -> Vec<(String, String, usize, Option<usize>)> {
        rows.iter()
            .map(|r| (r.part_number.clone(), r.new_level.clone(), r.depth, r.parent_id))
            .collect()
    }

    #[test]
    fn test_scheme_depth() {
        assert_eq!(LevelScheme::Rooted.depth(""), 0);
        assert_eq!(LevelScheme::Rooted.depth("1"), 1);
        assert_eq!(LevelScheme::Rooted.depth("1.3.2"), 3);
        assert_eq!(LevelScheme::Absolute.depth("1"), 0);
        assert_eq!(LevelScheme::Absolute.depth("1.3.2"), 2);
    }

    #[test]
    fn test_scheme_detect() {
        assert_eq!(
            LevelScheme::detect(&[row(0, "", "TOP"), row(1, "1", "A")]),
            LevelScheme::Rooted
        );
        assert_eq!(
            LevelScheme::detect(&[row(0, "1", "TOP"), row(1, "1.1", "A")]),
            LevelScheme::Absolute
        );
    }

    #[test]
    fn test_absolute_levels() {
        let rows = vec![
            row(0, "2", "B"),
            row(1, "2.1", "PIN"),
            row(2, "1", "A"),
            row(3, "1.4", "NUT"),
        ];
        let resolved = resolve_levels(rows).unwrap();
        assert_eq!(
            summary(&resolved),
            vec![
                ("A".to_string(), "1".to_string(), 0, None),
                ("NUT".to_string(), "1.1".to_string(), 1, Some(2)),
                ("B".to_string(), "2".to_string(), 0, None),
                ("PIN".to_string(), "2.1".to_string(), 1, Some(0)),
            ]
        );
    }

    #[test]
    fn test_output_levels_resolve_again() {
        let rows = vec![
            row(0, "", "TOP"),
            row(1, "3", "SUB"),
            row(2, "3.2", "PIN"),
            row(3, "1", "BASE"),
        ];
        let first = resolve_levels(rows).unwrap();
        let again: Vec<BomRow> = first
            .iter()
            .cloned()
            .map(|mut r| {
                r.raw_level = r.new_level.clone();
                r
            })
            .collect();
        let second = resolve_levels(again).unwrap();
        assert_eq!(summary(&first), summary(&second));
    }

    #[test]
    fn test_parent_level() {
        assert_eq!(parent_level("1.3.2"), "1.3");
        assert_eq!(parent_level("4"), "");
        assert_eq!(parent_level(""), "");
    }

    #[test]
    fn test_resequences_and_sorts_siblings() {
        let rows = vec![
            row(0, "", "TOP"),
            row(1, "1", "ZETA"),
            row(2, "1.1", "NUT"),
            row(3, "1.2", "BOLT"),
            row(4, "5", "ALPHA"),
            row(5, "5.9", "WASHER"),
        ];
        let resolved = resolve_levels(rows).unwrap();
        assert_eq!(
            summary(&resolved),
            vec![
                ("TOP".to_string(), "1".to_string(), 0, None),
                ("ALPHA".to_string(), "1.1".to_string(), 1, Some(0)),
                ("WASHER".to_string(), "1.1.1".to_string(), 2, Some(4)),
                ("ZETA".to_string(), "1.2".to_string(), 1, Some(0)),
                ("BOLT".to_string(), "1.2.1".to_string(), 2, Some(1)),
                ("NUT".to_string(), "1.2.2".to_string(), 2, Some(1)),
            ]
        );
    }

    #[test]
    fn test_multiple_roots_sorted() {
        let rows = vec![row(0, "", "B"), row(1, "", "A"), row(2, "1", "C")];
        let resolved = resolve_levels(rows).unwrap();
        // "1" hangs off the first "" row in input order
        assert_eq!(
            summary(&resolved),
            vec![
                ("A".to_string(), "1".to_string(), 0, None),
                ("B".to_string(), "2".to_string(), 0, None),
                ("C".to_string(), "2.1".to_string(), 1, Some(0)),
            ]
        );
    }

    #[test]
    fn test_equal_part_numbers_keep_input_order() {
        let rows = vec![
            row(0, "", "TOP"),
            row(1, "1", "SUB"),
            row(2, "2", "SUB"),
            row(3, "2.1", "PIN"),
        ];
        let resolved = resolve_levels(rows).unwrap();
        let ids: Vec<usize> = resolved.iter().map(|r| r.unique_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(resolved[2].new_level, "1.2");
        assert_eq!(resolved[3].new_level, "1.2.1");
    }

    #[test]
    fn test_orphan_is_integrity_error() {
        let rows = vec![row(0, "", "TOP"), row(1, "1", "A"), row(2, "1.2.1", "B")];
        let err = resolve_levels(rows).unwrap_err();
        match err {
            BomError::Integrity {
                unique_id,
                raw_level,
            } => {
                assert_eq!(unique_id, 2);
                assert_eq!(raw_level, "1.2.1");
            }
            other => panic!("Expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_intermediate_absolute_is_integrity_error() {
        let rows = vec![row(0, "1", "A"), row(1, "2.1", "B")];
        assert!(matches!(
            resolve_levels(rows),
            Err(BomError::Integrity { unique_id: 1, .. })
        ));
    }

    #[test]
    fn test_empty_segment_is_integrity_error() {
        let rows = vec![row(0, "", "TOP"), row(1, "1", "A"), row(2, "1..1", "B")];
        assert!(matches!(
            resolve_levels(rows),
            Err(BomError::Integrity { unique_id: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_level_first_wins() {
        let rows = vec![
            row(0, "", "TOP"),
            row(1, "1", "A"),
            row(2, "1", "B"),
            row(3, "1.1", "C"),
        ];
        let resolved = resolve_levels(rows).unwrap();
        let c = resolved.iter().find(|r| r.part_number == "C").unwrap();
        assert_eq!(c.parent_id, Some(1));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_levels(Vec::new()).unwrap().is_empty());
    }
}
