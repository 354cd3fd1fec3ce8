//! Schema design data model
//!
//! Tables, columns, relationships and indexes of a visual database design,
//! plus the fixed literal sets their enumerated fields draw from.

mod literals;
mod types;

pub use literals::{ColumnType, IndexKind, Literal, ReferentialAction, RelationshipKind};
pub use types::{
    Column, ForeignKey, Index, Position, Relationship, Schema, SchemaDraft, SchemaPatch, Table,
    DEFAULT_TABLE_COLOR,
};
