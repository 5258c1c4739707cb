//! Catalog rows to ERD payload conversion.
//!
//! Input is the result of one `information_schema` join: every column of a
//! schema, repeated once per key constraint it takes part in, with the
//! referenced column of foreign keys resolved.

use crate::payload::{ColumnInfo, ErdPayload, RelationshipInfo, TableInfo};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Cells per catalog row.
pub const ROW_WIDTH: usize = 12;

const TABLE_NAME: usize = 2;
const COLUMN_NAME: usize = 3;
const ORDINAL: usize = 4;
const DATA_TYPE: usize = 5;
const IS_NULLABLE: usize = 6;
const CONSTRAINT_TYPE: usize = 7;
const CONSTRAINT_NAME: usize = 8;
const REF_SCHEMA: usize = 9;
const REF_TABLE: usize = 10;
const REF_COLUMN: usize = 11;

pub type Row = Vec<Option<String>>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Row {row}: expected 12 cells, found {len}")]
    ShortRow { row: usize, len: usize },
    #[error("Row {row}: missing {field}")]
    MissingName { row: usize, field: &'static str },
    #[error("Invalid catalog rows: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON `data_array` (`[[cell, ...], ...]`) and assemble it.
pub fn assemble_json(input: &str, catalog: &str, schema: &str) -> Result<ErdPayload, CatalogError> {
    let rows: Vec<Row> = serde_json::from_str(input)?;
    assemble(&rows, catalog, schema)
}

pub fn assemble(rows: &[Row], catalog: &str, schema: &str) -> Result<ErdPayload, CatalogError> {
    let mut table_order: Vec<String> = Vec::new();
    let mut columns: HashMap<String, Vec<ColumnInfo>> = HashMap::new();
    let mut relationships = Vec::new();
    let mut seen_relationships: HashSet<String> = HashSet::new();

    for (i, row) in rows.iter().enumerate() {
        if row.len() < ROW_WIDTH {
            return Err(CatalogError::ShortRow { row: i, len: row.len() });
        }
        let cell = |idx: usize| row[idx].as_deref().filter(|s| !s.is_empty());
        let table = cell(TABLE_NAME).ok_or(CatalogError::MissingName { row: i, field: "table name" })?;
        let column = cell(COLUMN_NAME).ok_or(CatalogError::MissingName { row: i, field: "column name" })?;

        let table_columns = columns.entry(table.to_string()).or_insert_with(|| {
            table_order.push(table.to_string());
            Vec::new()
        });

        // One row per constraint; the first occurrence of a column wins.
        if !table_columns.iter().any(|c| c.column_name == column) {
            table_columns.push(ColumnInfo {
                column_name: column.to_string(),
                data_type: cell(DATA_TYPE).unwrap_or_default().to_string(),
                ordinal_position: cell(ORDINAL).and_then(|s| s.trim().parse().ok()).unwrap_or(0),
                is_nullable: cell(IS_NULLABLE).map(str::to_string),
                constraint_type: cell(CONSTRAINT_TYPE).map(str::to_string),
                constraint_name: cell(CONSTRAINT_NAME).map(str::to_string),
                referenced_table_schema: cell(REF_SCHEMA).map(str::to_string),
                referenced_table_name: cell(REF_TABLE).map(str::to_string),
                referenced_column_name: cell(REF_COLUMN).map(str::to_string),
            });
        }

        if cell(CONSTRAINT_TYPE) != Some("FOREIGN KEY") {
            continue;
        }
        let (Some(ref_table), Some(constraint_name)) = (cell(REF_TABLE), cell(CONSTRAINT_NAME)) else {
            continue;
        };
        let ref_column = cell(REF_COLUMN).unwrap_or_default();
        let key = format!("{}.{}->{}.{}", table, column, ref_table, ref_column);
        if seen_relationships.insert(key) {
            relationships.push(RelationshipInfo {
                constraint_name: constraint_name.to_string(),
                source_table: table.to_string(),
                source_column: column.to_string(),
                target_table: ref_table.to_string(),
                target_column: ref_column.to_string(),
                target_table_schema: cell(REF_SCHEMA).unwrap_or(schema).to_string(),
            });
        }
    }

    let tables = table_order
        .into_iter()
        .map(|name| {
            let mut cols = columns.remove(&name).unwrap_or_default();
            cols.sort_by_key(|c| c.ordinal_position);
            TableInfo {
                table_name: name,
                columns: cols,
            }
        })
        .collect();

    log::debug!(
        "assembled {}.{} from {} catalog rows, {} relationships",
        catalog,
        schema,
        rows.len(),
        relationships.len()
    );

    Ok(ErdPayload {
        catalog_name: Some(catalog.to_string()),
        schema_name: Some(schema.to_string()),
        tables,
        relationships,
    })
}
