//! Wire format delivered by the schema data source.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Invalid ERD payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErdPayload {
    #[serde(default)]
    pub catalog_name: Option<String>,
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    #[serde(default)]
    pub relationships: Vec<RelationshipInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub ordinal_position: i64,
    #[serde(default)]
    pub is_nullable: Option<String>,
    #[serde(default)]
    pub constraint_type: Option<String>,
    #[serde(default)]
    pub constraint_name: Option<String>,
    #[serde(default)]
    pub referenced_table_schema: Option<String>,
    #[serde(default)]
    pub referenced_table_name: Option<String>,
    #[serde(default)]
    pub referenced_column_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationshipInfo {
    pub constraint_name: String,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    #[serde(default)]
    pub target_table_schema: String,
}

impl ErdPayload {
    pub fn from_json(input: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(input)?)
    }
}
