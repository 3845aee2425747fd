//! Tabular input reader shared by the inventory and results importers.
//!
//! Header matching is case-insensitive, trims whitespace and treats `_`,
//! `-` and spaces alike, so `Impact category`, `impact_category` and
//! `IMPACT-CATEGORY` all address the same column.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::Real;

/// Malformed or incomplete tabular input.
#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("{source_name}: failed to read table: {message}")]
    Read {
        source_name: String,
        message: String,
    },

    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: String,
    },

    #[error("{source_name}: row {row}, column '{column}': invalid value '{value}' ({reason})")]
    InvalidValue {
        source_name: String,
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{source_name}: {message}")]
    Invalid {
        source_name: String,
        message: String,
    },
}

/// A parsed table: one header row plus string cells.
#[derive(Debug, Clone)]
pub struct Table {
    source_name: String,
    headers: Vec<String>,
    labels: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    /// 0-based data row index (header excluded).
    pub index: usize,
    cells: &'a [String],
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Table {
    /// Read a CSV file from disk.
    pub fn read(path: &Path) -> Result<Self, DataFormatError> {
        let source_name = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| DataFormatError::Read {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        Self::from_reader(file, &source_name)
    }

    /// Read CSV from any reader; `source_name` labels errors.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, DataFormatError> {
        let read_err = |e: csv::Error| DataFormatError::Read {
            source_name: source_name.to_string(),
            message: e.to_string(),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let labels: Vec<String> = rdr
            .headers()
            .map_err(read_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let headers: Vec<String> = labels.iter().map(|h| normalize_header(h)).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(read_err)?;
            if record.iter().all(|c| c.is_empty()) {
                continue;
            }
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        Ok(Self {
            source_name: source_name.to_string(),
            headers,
            labels,
            rows,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Normalised header names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Header of column `col` as written in the file.
    pub fn label(&self, col: usize) -> &str {
        self.labels.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column matching any of `aliases`.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let alias = normalize_header(alias);
            self.headers.iter().position(|h| *h == alias)
        })
    }

    /// Like [`Table::column`], but a missing column is a `DataFormatError`
    /// naming the first alias.
    pub fn require_column(&self, aliases: &[&str]) -> Result<usize, DataFormatError> {
        self.column(aliases)
            .ok_or_else(|| DataFormatError::MissingColumn {
                source_name: self.source_name.clone(),
                column: aliases.first().copied().unwrap_or_default().to_string(),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().enumerate().map(|(index, cells)| TableRow {
            table: self,
            index,
            cells,
        })
    }

    pub fn invalid(&self, message: impl Into<String>) -> DataFormatError {
        DataFormatError::Invalid {
            source_name: self.source_name.clone(),
            message: message.into(),
        }
    }
}

impl<'a> TableRow<'a> {
    /// Cell text, empty when the column index is out of range.
    pub fn get(&self, col: usize) -> &'a str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    /// Cell text, `None` for an absent column or an empty cell.
    pub fn opt(&self, col: Option<usize>) -> Option<&'a str> {
        col.map(|c| self.get(c)).filter(|s| !s.is_empty())
    }

    /// Parse a finite number.
    pub fn number(&self, col: usize) -> Result<Real, DataFormatError> {
        let raw = self.get(col);
        match raw.parse::<Real>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(self.invalid_value(col, "not a finite number")),
            Err(_) => Err(self.invalid_value(col, "not a number")),
        }
    }

    /// Parse an optional finite number; empty cells yield `None`.
    pub fn opt_number(&self, col: Option<usize>) -> Result<Option<Real>, DataFormatError> {
        match col {
            Some(c) if !self.get(c).is_empty() => self.number(c).map(Some),
            _ => Ok(None),
        }
    }

    /// Build an `InvalidValue` error for this row. Row numbers are 1-based
    /// data rows, matching what a spreadsheet shows below the header.
    pub fn invalid_value(&self, col: usize, reason: impl Into<String>) -> DataFormatError {
        DataFormatError::InvalidValue {
            source_name: self.table.source_name.clone(),
            row: self.index + 1,
            column: self
                .table
                .headers
                .get(col)
                .cloned()
                .unwrap_or_else(|| format!("#{col}")),
            value: self.get(col).to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &str) -> Table {
        Table::from_reader(data.as_bytes(), "inline").unwrap()
    }

    #[test]
    fn headers_are_normalised() {
        let t = table("Impact_Category , Result\nClimate change,12.5\n");
        assert_eq!(t.headers(), &["impact category", "result"]);
        assert_eq!(t.label(0), "Impact_Category");
        assert_eq!(t.column(&["impact category"]), Some(0));
        assert_eq!(t.column(&["value", "RESULT"]), Some(1));
    }

    #[test]
    fn missing_column_names_first_alias() {
        let t = table("name,amount\nSand,1\n");
        let err = t.require_column(&["flow", "material"]).unwrap_err();
        assert!(err.to_string().contains("'flow'"));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let t = table("flow\nSand\n,\n\nGravel\n");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table("flow,amount\nSand\n");
        let row = t.rows().next().unwrap();
        assert_eq!(row.get(1), "");
        assert_eq!(row.opt(Some(1)), None);
    }

    #[test]
    fn numbers_are_checked() {
        let t = table("v\n1.5\nabc\nNaN\n");
        let rows: Vec<_> = t.rows().collect();
        assert_eq!(rows[0].number(0).unwrap(), 1.5);
        let err = rows[1].number(0).unwrap_err();
        assert!(matches!(err, DataFormatError::InvalidValue { row: 2, .. }));
        assert!(rows[2].number(0).is_err());
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let t = table("\u{feff}flow\nSand\n");
        assert_eq!(t.column(&["flow"]), Some(0));
    }
}
