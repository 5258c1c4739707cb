use crate::payload::{ColumnInfo, ErdPayload, RelationshipInfo, TableInfo};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    None,
    PrimaryKey,
    ForeignKey,
}

impl ConstraintKind {
    /// Exact, case-sensitive match on the catalog's constraint type.
    pub fn from_str(s: &str) -> Self {
        match s {
            "PRIMARY KEY" => Self::PrimaryKey,
            "FOREIGN KEY" => Self::ForeignKey,
            _ => Self::None,
        }
    }

    pub fn is_key(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub schema: String,
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub ordinal: i64,
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub constraint: ConstraintKind,
    /// Populated only for foreign-key columns.
    pub reference: Option<ForeignKeyRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub constraint_name: String,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub target_schema: String,
}

/// The (catalog, schema) pair a diagram instance is showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DiagramIdentity {
    pub catalog: String,
    pub schema: String,
}

impl DiagramIdentity {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
        }
    }

    /// Identity named by a payload; missing names become empty.
    pub fn of(payload: &ErdPayload) -> Self {
        Self::named_or("", "", payload)
    }

    /// Identity chosen by the host. An empty `catalog` or `schema` falls
    /// back to the name carried in the payload.
    pub fn named_or(catalog: &str, schema: &str, payload: &ErdPayload) -> Self {
        let pick = |given: &str, carried: &Option<String>| {
            if given.is_empty() {
                carried.clone().unwrap_or_default()
            } else {
                given.to_string()
            }
        };
        Self::new(
            pick(catalog, &payload.catalog_name),
            pick(schema, &payload.schema_name),
        )
    }
}

/// Immutable view of one schema. Relationships whose endpoints do not
/// resolve to a present table are dropped at construction.
#[derive(Debug, Clone, Default)]
pub struct SchemaModel {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    index: HashMap<String, usize>,
}

impl SchemaModel {
    pub fn new(tables: Vec<Table>, relationships: Vec<Relationship>) -> Self {
        let index: HashMap<String, usize> = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        let total = relationships.len();
        let relationships: Vec<Relationship> = relationships
            .into_iter()
            .filter(|r| index.contains_key(&r.source_table) && index.contains_key(&r.target_table))
            .collect();

        if relationships.len() < total {
            log::debug!(
                "dropped {} relationship(s) referencing tables outside the schema",
                total - relationships.len()
            );
        }

        Self {
            tables,
            relationships,
            index,
        }
    }

    pub fn from_payload(payload: &ErdPayload) -> Self {
        let tables = payload.tables.iter().map(table_from_info).collect();
        let relationships = payload
            .relationships
            .iter()
            .map(relationship_from_info)
            .collect();
        Self::new(tables, relationships)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn table_from_info(info: &TableInfo) -> Table {
    let mut columns: Vec<Column> = info.columns.iter().map(column_from_info).collect();
    columns.sort_by_key(|c| c.ordinal);
    Table {
        name: info.table_name.clone(),
        columns,
    }
}

fn column_from_info(info: &ColumnInfo) -> Column {
    let constraint = info
        .constraint_type
        .as_deref()
        .map(ConstraintKind::from_str)
        .unwrap_or(ConstraintKind::None);

    let reference = match (constraint, &info.referenced_table_name) {
        (ConstraintKind::ForeignKey, Some(table)) => Some(ForeignKeyRef {
            schema: info.referenced_table_schema.clone().unwrap_or_default(),
            table: table.clone(),
            column: info.referenced_column_name.clone().unwrap_or_default(),
        }),
        _ => None,
    };

    Column {
        ordinal: info.ordinal_position,
        name: info.column_name.clone(),
        data_type: info.data_type.clone(),
        nullable: info
            .is_nullable
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("yes")),
        constraint,
        reference,
    }
}

fn relationship_from_info(info: &RelationshipInfo) -> Relationship {
    Relationship {
        constraint_name: info.constraint_name.clone(),
        source_table: info.source_table.clone(),
        source_column: info.source_column.clone(),
        target_table: info.target_table.clone(),
        target_column: info.target_column.clone(),
        target_schema: info.target_table_schema.clone(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn col(ordinal: i64, name: &str, constraint: ConstraintKind) -> Column {
        Column {
            ordinal,
            name: name.to_string(),
            data_type: "INT".to_string(),
            nullable: false,
            constraint,
            reference: None,
        }
    }

    /// Table with the given key columns first and `plain` filler columns after.
    pub fn table(name: &str, keys: &[(&str, ConstraintKind)], plain: usize) -> Table {
        let mut columns: Vec<Column> = keys
            .iter()
            .enumerate()
            .map(|(i, (n, k))| col(i as i64 + 1, n, *k))
            .collect();
        for i in 0..plain {
            let ordinal = columns.len() as i64 + 1;
            columns.push(col(ordinal, &format!("c{}", i), ConstraintKind::None));
        }
        Table {
            name: name.to_string(),
            columns,
        }
    }

    pub fn rel(source: &str, source_col: &str, target: &str, target_col: &str) -> Relationship {
        Relationship {
            constraint_name: format!("fk_{}_{}", source, source_col),
            source_table: source.to_string(),
            source_column: source_col.to_string(),
            target_table: target.to_string(),
            target_column: target_col.to_string(),
            target_schema: "main".to_string(),
        }
    }
}
