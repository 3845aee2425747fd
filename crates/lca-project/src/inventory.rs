//! Inventory loader: the laboratory bill of materials per functional unit.

use std::collections::HashMap;
use std::path::Path;

use lca_core::{DataFormatError, Table, normalize_amount};
use serde::{Deserialize, Serialize};

use crate::schema::InventoryDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
}

/// One row of the bill of materials. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// 0-based row index in the source table.
    pub index: usize,
    pub flow: String,
    /// Amount in the reference unit of `property`.
    pub amount: Option<f64>,
    /// Unit as written in the source table.
    pub unit: Option<String>,
    pub role: Role,
    /// Explicit process name; rows sharing one are merged.
    pub process: Option<String>,
    /// Flow property name, resolved against the role default.
    pub property: String,
}

impl InventoryRow {
    /// Process this row belongs to: the explicit name, else the flow name.
    pub fn process_name(&self) -> &str {
        self.process.as_deref().unwrap_or(&self.flow)
    }
}

/// Default flow properties per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefaults {
    pub input: String,
    pub output: String,
}

impl Default for PropertyDefaults {
    fn default() -> Self {
        Self {
            input: "Mass".to_string(),
            output: "Volume".to_string(),
        }
    }
}

impl From<&InventoryDef> for PropertyDefaults {
    fn from(def: &InventoryDef) -> Self {
        Self {
            input: def.input_property.clone(),
            output: def.output_property.clone(),
        }
    }
}

/// Ordered inventory with exactly one reference output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    source: String,
    rows: Vec<InventoryRow>,
    reference: usize,
}

const FLOW: &[&str] = &["flow", "material", "name"];
const AMOUNT: &[&str] = &["amount", "quantity"];
const UNIT: &[&str] = &["unit"];
const ROLE: &[&str] = &["role", "direction"];
const PROCESS: &[&str] = &["process"];
const PROPERTY: &[&str] = &["property", "flow property"];

fn parse_role(raw: &str) -> Option<Role> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "input" | "in" => Some(Role::Input),
        "output" | "out" | "product" | "reference" => Some(Role::Output),
        _ => None,
    }
}

impl Inventory {
    pub fn from_table(table: &Table, defaults: &PropertyDefaults) -> Result<Self, DataFormatError> {
        let flow_col = table.require_column(FLOW)?;
        let amount_col = table.column(AMOUNT);
        let unit_col = table.column(UNIT);
        let role_col = table.column(ROLE);
        let process_col = table.column(PROCESS);
        let property_col = table.column(PROPERTY);

        if table.is_empty() {
            return Err(table.invalid("inventory has no rows"));
        }

        let mut rows = Vec::with_capacity(table.len());
        for row in table.rows() {
            let flow = row.get(flow_col).to_string();
            if flow.is_empty() {
                return Err(row.invalid_value(flow_col, "flow name must not be empty"));
            }

            let role = match (role_col, row.opt(role_col)) {
                (Some(col), Some(raw)) => parse_role(raw)
                    .ok_or_else(|| row.invalid_value(col, "expected input or output"))?,
                _ => Role::Input,
            };

            rows.push(InventoryRow {
                index: row.index,
                flow,
                amount: row.opt_number(amount_col)?,
                unit: row.opt(unit_col).map(str::to_string),
                role,
                process: row.opt(process_col).map(str::to_string),
                property: row.opt(property_col).unwrap_or_default().to_string(),
            });
        }

        // Exactly one reference output; by convention the last row when
        // none is marked.
        let outputs: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.role == Role::Output)
            .map(|(i, _)| i)
            .collect();
        let reference = match outputs.as_slice() {
            [] => rows.len() - 1,
            [only] => *only,
            many => {
                let names: Vec<&str> = many.iter().map(|&i| rows[i].flow.as_str()).collect();
                return Err(table.invalid(format!(
                    "multiple reference outputs: {}",
                    names.join(", ")
                )));
            }
        };
        rows[reference].role = Role::Output;

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for r in &rows {
            if let Some(first) = seen.insert(r.flow.as_str(), r.index) {
                return Err(table.invalid(format!(
                    "duplicate flow '{}' (rows {} and {})",
                    r.flow,
                    first + 1,
                    r.index + 1
                )));
            }
        }

        for (row, inv) in table.rows().zip(rows.iter_mut()) {
            if inv.property.is_empty() {
                inv.property = match inv.role {
                    Role::Input => defaults.input.clone(),
                    Role::Output => defaults.output.clone(),
                };
            }
            if let Some(amount) = inv.amount {
                if amount < 0.0 {
                    let col = amount_col.unwrap_or(flow_col);
                    return Err(row.invalid_value(col, "amount must not be negative"));
                }
                inv.amount = Some(
                    normalize_amount(amount, inv.unit.as_deref(), &inv.property).map_err(|e| {
                        row.invalid_value(unit_col.unwrap_or(flow_col), e.to_string())
                    })?,
                );
            }
        }

        Ok(Self {
            source: table.source_name().to_string(),
            rows,
            reference,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The reference output row (the functional-unit product).
    pub fn reference(&self) -> &InventoryRow {
        &self.rows[self.reference]
    }

    /// Input rows in file order.
    pub fn inputs(&self) -> impl Iterator<Item = &InventoryRow> + '_ {
        self.rows.iter().filter(|r| r.role == Role::Input)
    }

    /// Distinct flow names in file order.
    pub fn flow_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.flow.as_str()).collect()
    }
}

/// Read an inventory table from disk.
pub fn load_inventory(path: &Path, defaults: &PropertyDefaults) -> Result<Inventory, DataFormatError> {
    let table = Table::read(path)?;
    Inventory::from_table(&table, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(data: &str) -> Result<Inventory, DataFormatError> {
        let table = Table::from_reader(data.as_bytes(), "inline").unwrap();
        Inventory::from_table(&table, &PropertyDefaults::default())
    }

    #[test]
    fn flow_column_only() {
        let inv = inventory("flow\nSand\nGravel\nGeopolymer concrete\n").unwrap();
        assert_eq!(inv.len(), 3);
        assert_eq!(inv.reference().flow, "Geopolymer concrete");
        assert_eq!(inv.reference().property, "Volume");
        assert_eq!(inv.inputs().count(), 2);
        assert_eq!(inv.rows()[0].property, "Mass");
        assert_eq!(inv.rows()[0].amount, None);
    }

    #[test]
    fn missing_flow_column_is_rejected() {
        let err = inventory("material_name,amount\nSand,1\n").unwrap_err();
        assert!(matches!(err, DataFormatError::MissingColumn { .. }));
    }

    #[test]
    fn explicit_output_row_is_reference() {
        let inv = inventory(
            "flow,role\nGeopolymer concrete,output\nSand,input\nGravel,\n",
        )
        .unwrap();
        assert_eq!(inv.reference().flow, "Geopolymer concrete");
        assert_eq!(inv.rows()[2].role, Role::Input);
    }

    #[test]
    fn two_outputs_are_rejected() {
        let err = inventory("flow,role\nA,output\nB,output\n").unwrap_err();
        assert!(err.to_string().contains("multiple reference outputs"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = inventory("flow,role\nA,sideways\n").unwrap_err();
        assert!(matches!(err, DataFormatError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn amounts_are_normalised() {
        let inv = inventory(
            "flow,amount,unit\nGravel,1.2,t\nSand,650,kg\nGeopolymer concrete,1000,L\n",
        )
        .unwrap();
        assert!((inv.rows()[0].amount.unwrap() - 1200.0).abs() < 1e-9);
        assert!((inv.rows()[1].amount.unwrap() - 650.0).abs() < 1e-9);
        assert!((inv.reference().amount.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unit_must_match_property() {
        // Water defaults to Mass, and litres are not a mass unit.
        let err = inventory("flow,amount,unit\nWater,20,L\nConcrete,1,m3\n").unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }

    #[test]
    fn property_column_overrides_default() {
        let inv = inventory(
            "flow,amount,unit,property\nWater,20,L,Volume\nConcrete,1,m3,\n",
        )
        .unwrap();
        assert!((inv.rows()[0].amount.unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(inv.reference().amount, Some(1.0));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = inventory("flow,amount\nSand,-1\nConcrete,1\n").unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn duplicate_flows_are_rejected() {
        let err = inventory("flow\nSand\nSand\nConcrete\n").unwrap_err();
        assert!(err.to_string().contains("duplicate flow 'Sand'"));
    }

    #[test]
    fn empty_inventory_is_rejected() {
        assert!(inventory("flow\n").is_err());
    }
}
