//! Enumerated fields of a schema design
//!
//! Each enumeration serializes to the exact literal accepted on the wire.
//! The validator matches payload strings against [`Literal::ALL`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed set of string literals
pub trait Literal: Copy + Sized + 'static {
    /// Every allowed value, in declaration order
    const ALL: &'static [Self];

    /// The wire literal for this value
    fn as_str(&self) -> &'static str;

    /// Match a wire literal exactly (case-sensitive)
    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// Human-readable list of the allowed literals
    fn expected() -> String {
        let names: Vec<String> = Self::ALL
            .iter()
            .map(|v| format!("'{}'", v.as_str()))
            .collect();
        format!("one of {}", names.join(", "))
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Varchar,
    Text,
    Boolean,
    Date,
    Timestamp,
    Decimal,
    Json,
    Uuid,
    Bigint,
    Float,
    Double,
}

impl Literal for ColumnType {
    const ALL: &'static [Self] = &[
        ColumnType::Integer,
        ColumnType::Varchar,
        ColumnType::Text,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Timestamp,
        ColumnType::Decimal,
        ColumnType::Json,
        ColumnType::Uuid,
        ColumnType::Bigint,
        ColumnType::Float,
        ColumnType::Double,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Varchar => "varchar",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Decimal => "decimal",
            ColumnType::Json => "json",
            ColumnType::Uuid => "uuid",
            ColumnType::Bigint => "bigint",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
        }
    }
}

/// Referential action for a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[default]
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl Literal for ReferentialAction {
    const ALL: &'static [Self] = &[
        ReferentialAction::Cascade,
        ReferentialAction::SetNull,
        ReferentialAction::Restrict,
        ReferentialAction::NoAction,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

/// Cardinality of a relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Literal for RelationshipKind {
    const ALL: &'static [Self] = &[
        RelationshipKind::OneToOne,
        RelationshipKind::OneToMany,
        RelationshipKind::ManyToMany,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "one-to-one",
            RelationshipKind::OneToMany => "one-to-many",
            RelationshipKind::ManyToMany => "many-to-many",
        }
    }
}

/// Kind of a named index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Index,
    Unique,
    Fulltext,
}

impl Literal for IndexKind {
    const ALL: &'static [Self] = &[IndexKind::Index, IndexKind::Unique, IndexKind::Fulltext];

    fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Index => "index",
            IndexKind::Unique => "unique",
            IndexKind::Fulltext => "fulltext",
        }
    }
}

macro_rules! display_literal {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_literal!(ColumnType, ReferentialAction, RelationshipKind, IndexKind);
