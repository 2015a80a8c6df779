//! Core resolve pipeline shared by the CLI and library callers.
//! No file formats or terminal output here beyond the CSV convenience entry point.

use std::path::{Path, PathBuf};

use crate::chain::resolve_parent_chains;
use crate::classify::classify;
use crate::level::resolve_levels;
use crate::loader;
use crate::model::{BomRow, PartType};
use crate::normalize::normalize;
use crate::rollup::rollup_quantities;
use crate::table::RecordTable;

#[derive(Debug, thiserror::Error)]
pub enum BomError {
    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Orphan level path: row {unique_id} has level '{raw_level}' but no parent row exists")]
    Integrity { unique_id: usize, raw_level: String },
    #[error("Parent chain of row {unique_id} does not terminate; parent linkage is corrupted")]
    Cycle { unique_id: usize },
    #[error("Total quantity overflow at row {unique_id} ({part_number})")]
    Overflow { unique_id: usize, part_number: String },
    #[error("Invalid quantity '{value}' at row {unique_id}")]
    Quantity { unique_id: usize, value: String },
    #[error("Load error: {0}")]
    Load(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for resolve runs (CLI or library).
#[derive(Clone, Debug)]
pub struct ResolveOptions {
    /// Extension of part files, uppercase.
    pub part_extension: String,
    /// Extension of assembly files, uppercase.
    pub assembly_extension: String,
    /// Configuration name meaning "use the file name alone".
    pub no_config_token: String,
    /// Material assigned to assemblies exported without one.
    pub assembly_material: String,
    /// Fail when the export has no `Level` column instead of treating every row as a root.
    pub require_level_column: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            part_extension: "SLDPRT".to_string(),
            assembly_extension: "SLDASM".to_string(),
            no_config_token: "NOCONFIG".to_string(),
            assembly_material: "N/A - Assembly".to_string(),
            require_level_column: true,
        }
    }
}

/// Fully resolved BOM: rows in depth-first order plus counts.
#[derive(Debug, Clone)]
pub struct ResolvedBom {
    pub source: Option<PathBuf>,
    pub rows: Vec<BomRow>,
    pub stats: ResolveStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ResolveStats {
    pub input_rows: usize,
    pub dropped_rows: usize,
    pub rows: usize,
    pub roots: usize,
    pub max_depth: usize,
    pub dss_parts: usize,
    pub dss_assemblies: usize,
    pub cots: usize,
    pub duplicates: usize,
    pub drawings: usize,
}

impl ResolvedBom {
    /// Look up a row by its unique id.
    pub fn row(&self, unique_id: usize) -> Option<&BomRow> {
        self.rows.iter().find(|r| r.unique_id == unique_id)
    }

    /// Top-level rows in resolved order.
    pub fn roots(&self) -> impl Iterator<Item = &BomRow> {
        self.rows.iter().filter(|r| r.is_root())
    }

    /// Direct children of `unique_id` in resolved order.
    pub fn children(&self, unique_id: usize) -> impl Iterator<Item = &BomRow> {
        self.rows
            .iter()
            .filter(move |r| r.parent_id == Some(unique_id))
    }

    /// Assembly number of the first root, used for default export names.
    pub fn top_assembly(&self) -> Option<&str> {
        self.roots().next().map(|r| r.part_number.as_str())
    }
}

fn rows_to_stats(input_rows: usize, rows: &[BomRow]) -> ResolveStats {
    let mut stats = ResolveStats {
        input_rows,
        dropped_rows: input_rows.saturating_sub(rows.len()),
        rows: rows.len(),
        ..ResolveStats::default()
    };
    for r in rows {
        if r.is_root() {
            stats.roots += 1;
        }
        stats.max_depth = stats.max_depth.max(r.depth);
        match r.part_type {
            PartType::DssPart => stats.dss_parts += 1,
            PartType::DssAssy => stats.dss_assemblies += 1,
            PartType::Cots => stats.cots += 1,
        }
        if r.is_duplicate {
            stats.duplicates += 1;
        }
        if r.is_drawing {
            stats.drawings += 1;
        }
    }
    stats
}

/// Core resolve API used by both library callers and the CLI.
pub struct BomCore;

impl BomCore {
    /// Run the full pipeline over an already loaded record set.
    ///
    /// Normalize -> classify -> rebuild levels -> parent chains -> quantity rollup.
    /// Each phase owns the rows it receives and hands a new vector to the next;
    /// any failure aborts the run, there is no partial result.
    pub fn resolve(
        table: &RecordTable,
        options: &ResolveOptions,
    ) -> Result<ResolvedBom, BomError> {
        let rows = normalize(table, options)?;
        tracing::debug!("Normalized {} of {} rows", rows.len(), table.len());

        let rows = classify(rows, options);
        let rows = resolve_levels(rows)?;
        let rows = resolve_parent_chains(rows)?;
        let rows = rollup_quantities(rows)?;

        let stats = rows_to_stats(table.len(), &rows);
        tracing::info!(
            "Resolved BOM: {} rows, {} roots, max depth {}, {} duplicates",
            stats.rows,
            stats.roots,
            stats.max_depth,
            stats.duplicates
        );
        Ok(ResolvedBom {
            source: None,
            rows,
            stats,
        })
    }

    /// Load a PDM CSV export and resolve it.
    pub fn resolve_csv(path: &Path, options: &ResolveOptions) -> Result<ResolvedBom, BomError> {
        let table = loader::load_csv_path(path)?;
        let mut bom = Self::resolve(&table, options)?;
        bom.source = Some(path.to_path_buf());
        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> RecordTable {
        RecordTable::from_rows(
            &["Name", "Configuration", "PartNumOverride", "Level", "QTY"],
            &[
                &["TOP.SLDASM", "", "", "", "1"],
                &["SUB.SLDPRT", "", "", "1", "1"],
                &["SUB.SLDPRT", "", "", "1", "3"],
            ],
        )
    }

    #[test]
    fn test_resolve_stats() {
        let bom = BomCore::resolve(&scenario_a(), &ResolveOptions::default()).unwrap();
        assert_eq!(bom.stats.rows, 3);
        assert_eq!(bom.stats.roots, 1);
        assert_eq!(bom.stats.max_depth, 1);
        assert_eq!(bom.stats.duplicates, 1);
        assert_eq!(bom.stats.cots, 3);
        assert_eq!(bom.top_assembly(), Some("TOP"));
    }

    #[test]
    fn test_children_lookup() {
        let bom = BomCore::resolve(&scenario_a(), &ResolveOptions::default()).unwrap();
        let top = bom.roots().next().unwrap().unique_id;
        assert_eq!(bom.children(top).count(), 2);
        assert!(bom.row(2).is_some());
        assert!(bom.row(3).is_none());
    }

    #[test]
    fn test_error_messages() {
        let err = BomError::Schema {
            missing: vec!["Name".to_string(), "Level".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: Name, Level");

        let err = BomError::Integrity {
            unique_id: 7,
            raw_level: "1.2.1".to_string(),
        };
        assert!(err.to_string().contains("row 7"));
        assert!(err.to_string().contains("1.2.1"));
    }
}
