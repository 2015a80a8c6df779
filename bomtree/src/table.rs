//! In-memory tabular record set
//!
//! Loaders (CSV files, spreadsheets, database queries) produce a
//! [`RecordTable`]; the resolver only ever reads from one. Cells are kept as
//! strings exactly as exported; interpretation happens in the pipeline.

use std::collections::HashMap;

/// Column names read from PDM exports.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const CONFIGURATION: &str = "Configuration";
    pub const PART_NUM_OVERRIDE: &str = "PartNumOverride";
    pub const LEVEL: &str = "Level";
    pub const QTY: &str = "QTY";
    pub const MATERIAL: &str = "Material";
    pub const DESCRIPTION: &str = "Description";
    pub const CAGE_CODE: &str = "Cage Code";
    pub const REVISION: &str = "Revision";
    pub const WEIGHT: &str = "Weight";
    pub const FINISH_1: &str = "Finish 1";
    pub const FINISH_2: &str = "Finish 2";
    pub const FINISH_3: &str = "Finish 3";
    pub const STATE: &str = "State";
    pub const LATEST_VERSION: &str = "Latest Version";
}

/// Header row plus string cells.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Create an empty table with the given header row.
    ///
    /// Header names are trimmed. When a name repeats, the first column wins.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.into().trim().to_string())
            .collect();
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }
        Self {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows (handy for tests and small fixtures).
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(headers.iter().copied());
        for row in rows {
            table.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        table
    }

    /// Append a row. Short rows are padded with empty cells, long rows truncated.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names from `required` that are not present in the header row.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in input order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            index: &self.index,
            cells,
        })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: &'a HashMap<String, usize>,
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Cell text, or `None` when the column is absent.
    pub fn raw(&self, column: &str) -> Option<&'a str> {
        self.index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(String::as_str)
    }

    /// Trimmed cell text, or `None` when the column is absent or the cell is blank.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.raw(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Owned variant of [`Record::get`].
    pub fn get_owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns() {
        let table = RecordTable::new(["Name", " Level ", "QTY"]);
        assert!(table.has_column("Level"));
        assert_eq!(
            table.missing_columns(&["Name", "Configuration", "Level"]),
            vec!["Configuration".to_string()]
        );
    }

    #[test]
    fn test_record_access() {
        let table = RecordTable::from_rows(
            &["Name", "Configuration", "QTY"],
            &[&["TOP.SLDASM", "  ", "2"], &["SHORT.SLDPRT"]],
        );
        let records: Vec<_> = table.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Name"), Some("TOP.SLDASM"));
        assert_eq!(records[0].raw("Configuration"), Some("  "));
        assert_eq!(records[0].get("Configuration"), None);
        assert_eq!(records[0].get("Level"), None);
        // padded
        assert_eq!(records[1].raw("QTY"), Some(""));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let table = RecordTable::from_rows(&["Name", "Name"], &[&["A.SLDPRT", "B.SLDPRT"]]);
        let record = table.records().next().unwrap();
        assert_eq!(record.get("Name"), Some("A.SLDPRT"));
    }
}
