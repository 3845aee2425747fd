//! Impact, contribution and damage table importers.
//!
//! Pure parsing: the external engine already solved the system, so nothing
//! here computes beyond summing repeated entries.

use std::path::Path;

use lca_core::{DataFormatError, Table, TableRow, ensure_non_negative};
use tracing::debug;

use crate::types::{ContributionTable, DamageFactor, DamageTable, ImpactLevel, ImpactResult, ImpactTable};

const CATEGORY: &[&str] = &["category", "impact category", "indicator"];
const VALUE: &[&str] = &["value", "result", "amount"];
const UNIT: &[&str] = &["unit", "reference unit"];
const LEVEL: &[&str] = &["level", "type"];
const PROCESS: &[&str] = &["process", "material", "flow", "name"];
const SHARE: &[&str] = &["value", "share", "contribution", "result", "amount"];
const MIDPOINT: &[&str] = &["midpoint", "source"];
const ENDPOINT: &[&str] = &["endpoint", "target"];

fn parse_level(raw: &str) -> Option<ImpactLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "midpoint" | "mid" => Some(ImpactLevel::Midpoint),
        "endpoint" | "end" | "damage" => Some(ImpactLevel::Endpoint),
        _ => None,
    }
}

/// Cell `col` as a finite, non-negative number.
fn amount_cell(row: &TableRow<'_>, col: usize, value: f64, what: &'static str) -> Result<f64, DataFormatError> {
    ensure_non_negative(value, what).map_err(|e| row.invalid_value(col, e.to_string()))
}

pub fn import_impacts(table: &Table) -> Result<ImpactTable, DataFormatError> {
    let category_col = table.require_column(CATEGORY)?;
    let value_col = table.require_column(VALUE)?;
    let unit_col = table.column(UNIT);
    let level_col = table.column(LEVEL);

    let mut results: Vec<ImpactResult> = Vec::with_capacity(table.len());
    for row in table.rows() {
        let category = row.get(category_col);
        if category.is_empty() {
            return Err(row.invalid_value(category_col, "category must not be empty"));
        }
        if results.iter().any(|r| r.category == category) {
            return Err(row.invalid_value(category_col, "duplicate category"));
        }
        let level = match (level_col, row.opt(level_col)) {
            (Some(col), Some(raw)) => {
                parse_level(raw).ok_or_else(|| row.invalid_value(col, "expected midpoint or endpoint"))?
            }
            _ => ImpactLevel::Midpoint,
        };
        results.push(ImpactResult {
            category: category.to_string(),
            value: row.number(value_col)?,
            unit: row.opt(unit_col).map(str::to_string),
            level,
        });
    }
    debug!(source = table.source_name(), categories = results.len(), "impacts imported");
    Ok(ImpactTable { results })
}

/// Import a contribution table in long form (`process`, `category`,
/// `value`) or wide form (process column followed by one column per
/// category).
pub fn import_contributions(table: &Table) -> Result<ContributionTable, DataFormatError> {
    let mut out = ContributionTable::default();
    let long_form = table.column(CATEGORY).zip(table.column(SHARE));

    match long_form {
        Some((category_col, value_col)) => {
            let process_col = table.require_column(PROCESS)?;
            for row in table.rows() {
                let process = row.get(process_col);
                let category = row.get(category_col);
                if process.is_empty() {
                    return Err(row.invalid_value(process_col, "process must not be empty"));
                }
                if category.is_empty() {
                    return Err(row.invalid_value(category_col, "category must not be empty"));
                }
                let value = amount_cell(&row, value_col, row.number(value_col)?, "contribution")?;
                out.add(process, category, value);
            }
        }
        None => {
            let process_col = table.column(PROCESS).unwrap_or(0);
            let category_cols: Vec<usize> =
                (0..table.headers().len()).filter(|&c| c != process_col).collect();
            if category_cols.is_empty() {
                return Err(table.invalid("contribution table has no category columns"));
            }
            for row in table.rows() {
                let process = row.get(process_col);
                if process.is_empty() {
                    return Err(row.invalid_value(process_col, "process must not be empty"));
                }
                for &col in &category_cols {
                    let raw = row.opt_number(Some(col))?.unwrap_or(0.0);
                    let value = amount_cell(&row, col, raw, "contribution")?;
                    out.add(process, table.label(col), value);
                }
            }
        }
    }

    if out.processes.is_empty() {
        return Err(table.invalid("contribution table has no rows"));
    }
    debug!(
        source = table.source_name(),
        processes = out.processes.len(),
        categories = out.categories.len(),
        "contributions imported"
    );
    Ok(out)
}

pub fn import_damage(table: &Table) -> Result<DamageTable, DataFormatError> {
    let midpoint_col = table.require_column(MIDPOINT)?;
    let endpoint_col = table.require_column(ENDPOINT)?;
    let value_col = table.require_column(VALUE)?;

    let mut factors = Vec::with_capacity(table.len());
    for row in table.rows() {
        let midpoint = row.get(midpoint_col);
        let endpoint = row.get(endpoint_col);
        if midpoint.is_empty() || endpoint.is_empty() {
            let col = if midpoint.is_empty() { midpoint_col } else { endpoint_col };
            return Err(row.invalid_value(col, "category must not be empty"));
        }
        let value = amount_cell(&row, value_col, row.number(value_col)?, "damage")?;
        factors.push(DamageFactor {
            midpoint: midpoint.to_string(),
            endpoint: endpoint.to_string(),
            value,
        });
    }
    Ok(DamageTable { factors })
}

pub fn load_impacts(path: &Path) -> Result<ImpactTable, DataFormatError> {
    import_impacts(&Table::read(path)?)
}

pub fn load_contributions(path: &Path) -> Result<ContributionTable, DataFormatError> {
    import_contributions(&Table::read(path)?)
}

pub fn load_damage(path: &Path) -> Result<DamageTable, DataFormatError> {
    import_damage(&Table::read(path)?)
}
