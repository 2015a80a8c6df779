//! bomtree - hierarchical BOM resolver for PDM exports
//!
//! PDM systems export a bill of materials as a flat list of rows, each tagged
//! with a dotted level path ("1.3.2"). This library turns that list into a
//! verified assembly tree: contiguous re-sequenced levels, parent links,
//! depth, part type, duplicate and drawing flags, and rolled-up quantities.
//!
//! # Quick Start
//!
//! ```no_run
//! use bomtree::{BomCore, ResolveOptions};
//! use std::path::Path;
//!
//! let bom = BomCore::resolve_csv(
//!     Path::new("1234567.SLDASM.1.BOM.csv"),
//!     &ResolveOptions::default(),
//! ).unwrap();
//!
//! for row in &bom.rows {
//!     println!("{:<10} {:<20} {:>4}", row.new_level, row.part_number, row.total_qty);
//! }
//! ```
//!
//! # Pipeline
//!
//! - **Normalize**: drop non-CAD rows, derive part numbers
//! - **Classify**: DSS part / DSS assembly / COTS, drawings, duplicates
//! - **Levels**: link parents, sort siblings, re-sequence level paths
//! - **Parent chains**: used-on and full ancestor lists
//! - **Rollup**: total quantity through every ancestor

pub mod chain;
pub mod classify;
pub mod core;
pub mod export;
pub mod level;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pattern;
pub mod rollup;
pub mod table;
pub mod views;

// Re-export main types
pub use crate::core::{BomCore, BomError, ResolveOptions, ResolveStats, ResolvedBom};
pub use crate::model::{BomRow, FileKind, PartDetails, PartType};
pub use crate::table::{Record, RecordTable};
pub use crate::views::{DrawingEntry, PartSummary, ShipsetRequirement};

/// Load a CSV export without resolving it (convenience wrapper).
pub fn load_csv(path: &std::path::Path) -> Result<RecordTable, BomError> {
    loader::load_csv_path(path)
}

/// Resolve an in-memory record set with default options (convenience wrapper).
pub fn resolve(table: &RecordTable) -> Result<ResolvedBom, BomError> {
    BomCore::resolve(table, &ResolveOptions::default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BomCore, BomError, BomRow, PartType, RecordTable, ResolveOptions, ResolveStats,
        ResolvedBom,
    };
}
