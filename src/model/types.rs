//! Schema design types
//!
//! A [`Schema`] owns its tables, relationships and indexes. Nothing below a
//! schema has an identity of its own outside the parent document.
//!
//! Three shapes exist for the top-level entity:
//! - [`SchemaDraft`]: validated create payload, no system fields
//! - [`SchemaPatch`]: validated update payload, every field optional
//! - [`Schema`]: output model with system-assigned fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::literals::{ColumnType, IndexKind, ReferentialAction, RelationshipKind};

/// Default table color on the design canvas
pub const DEFAULT_TABLE_COLOR: &str = "#3B82F6";

fn default_color() -> String {
    DEFAULT_TABLE_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

/// Canvas coordinates of a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Structural foreign-key annotation on a column.
///
/// The referenced table and column are not checked for existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
}

/// One field of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Meaningful for sized types; not checked against `column_type`
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub precision: Option<i64>,
    #[serde(default)]
    pub scale: Option<i64>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub foreign_key: Option<ForeignKey>,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Column {
    /// A column with every optional attribute at its default
    pub fn new(id: impl Into<String>, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default_value: None,
            foreign_key: None,
            index: false,
            comment: None,
        }
    }
}

/// One logical table of a schema design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Client-supplied, unique within the schema
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Edge between two tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Named index specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub table: String,
    pub columns: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: IndexKind,
    pub name: String,
}

/// Validated create payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDraft {
    pub name: String,
    pub description: Option<String>,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub indexes: Vec<Index>,
    pub is_public: bool,
}

impl SchemaDraft {
    /// An empty, private design with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tables: Vec::new(),
            relationships: Vec::new(),
            indexes: Vec::new(),
            is_public: false,
        }
    }
}

/// Validated update payload.
///
/// `None` means "leave untouched". A present collection replaces the stored
/// one wholesale. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<Index>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl SchemaPatch {
    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tables.is_none()
            && self.relationships.is_none()
            && self.indexes.is_none()
            && self.is_public.is_none()
    }
}

/// Persisted schema design, as returned at the API boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Opaque identifier rendered as a string
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub is_public: bool,
    /// Owner reference; always unset until authentication exists
    #[serde(default)]
    pub user_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
