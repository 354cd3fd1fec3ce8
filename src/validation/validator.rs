//! Schema payload validator
//!
//! Validation semantics:
//! - Payload root must be an object
//! - Required fields are present and non-null
//! - Field types match exactly (no coercion); coordinates accept any number
//! - Enumerated fields match one of their literals exactly
//! - Nested collections are validated element by element
//! - Unknown fields are ignored
//! - Omitted optional fields receive their documented defaults
//!
//! Validation is fail-fast: the first violation, in field declaration
//! order, is reported with its full path.

use serde_json::{Map, Value};

use crate::model::{
    Column, ColumnType, ForeignKey, Index, IndexKind, Literal, Position, ReferentialAction,
    Relationship, RelationshipKind, SchemaDraft, SchemaPatch, Table, DEFAULT_TABLE_COLOR,
};

use super::errors::{ValidationError, ValidationResult};

/// Validates untrusted schema payloads into typed drafts and patches.
///
/// Pure: no I/O, no mutation of the payload.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates a create payload.
    ///
    /// System fields (`id`, `version`, timestamps, `user_id`) are not part of
    /// the create shape and are ignored if supplied.
    pub fn validate_create(payload: &Value) -> ValidationResult<SchemaDraft> {
        let root = Fields::object(payload, "")?;

        Ok(SchemaDraft {
            name: root.required("name", string)?,
            description: root.optional("description", string)?,
            tables: root.defaulted("tables", Vec::new, |v, p| list(v, p, table))?,
            relationships: root.defaulted("relationships", Vec::new, |v, p| {
                list(v, p, relationship)
            })?,
            indexes: root.defaulted("indexes", Vec::new, |v, p| list(v, p, index))?,
            is_public: root.defaulted("is_public", || false, boolean)?,
        })
    }

    /// Validates an update payload.
    ///
    /// Every field is optional. Only present fields are checked and carried
    /// into the patch. `description` may be null to clear it; every other
    /// present field must be non-null.
    pub fn validate_update(payload: &Value) -> ValidationResult<SchemaPatch> {
        let root = Fields::object(payload, "")?;

        Ok(SchemaPatch {
            name: root.present("name", string)?,
            description: root.clearable("description", string)?,
            tables: root.present("tables", |v, p| list(v, p, table))?,
            relationships: root.present("relationships", |v, p| list(v, p, relationship))?,
            indexes: root.present("indexes", |v, p| list(v, p, index))?,
            is_public: root.present("is_public", boolean)?,
        })
    }
}

/// A JSON object being validated, together with its path
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn object(value: &'a Value, path: &'a str) -> ValidationResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            let field = if path.is_empty() { "$root" } else { path };
            mismatch(field, "object", value)
        })?;
        Ok(Self { obj, path })
    }

    /// Field must be present and valid.
    fn required<T>(
        &self,
        key: &str,
        convert: impl Fn(&Value, &str) -> ValidationResult<T>,
    ) -> ValidationResult<T> {
        let path = make_path(self.path, key);
        match self.obj.get(key) {
            Some(value) => convert(value, &path),
            None => Err(ValidationError::missing_field(path)),
        }
    }

    /// Field takes `default` when absent; null is rejected.
    fn defaulted<T>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
        convert: impl Fn(&Value, &str) -> ValidationResult<T>,
    ) -> ValidationResult<T> {
        match self.obj.get(key) {
            Some(value) => convert(value, &make_path(self.path, key)),
            None => Ok(default()),
        }
    }

    /// Field may be absent or null.
    fn optional<T>(
        &self,
        key: &str,
        convert: impl Fn(&Value, &str) -> ValidationResult<T>,
    ) -> ValidationResult<Option<T>> {
        match self.obj.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(value, &make_path(self.path, key)).map(Some),
        }
    }

    /// Field is carried only when present; null is rejected.
    fn present<T>(
        &self,
        key: &str,
        convert: impl Fn(&Value, &str) -> ValidationResult<T>,
    ) -> ValidationResult<Option<T>> {
        match self.obj.get(key) {
            None => Ok(None),
            Some(value) => convert(value, &make_path(self.path, key)).map(Some),
        }
    }

    /// Field is carried when present; null means "clear".
    fn clearable<T>(
        &self,
        key: &str,
        convert: impl Fn(&Value, &str) -> ValidationResult<T>,
    ) -> ValidationResult<Option<Option<T>>> {
        match self.obj.get(key) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(value) => convert(value, &make_path(self.path, key)).map(|v| Some(Some(v))),
        }
    }
}

// ==================
// Element converters
// ==================

fn table(value: &Value, path: &str) -> ValidationResult<Table> {
    let fields = Fields::object(value, path)?;

    Ok(Table {
        id: fields.required("id", string)?,
        name: fields.required("name", string)?,
        position: fields.required("position", position)?,
        color: fields.defaulted("color", || DEFAULT_TABLE_COLOR.to_string(), string)?,
        columns: fields.defaulted("columns", Vec::new, |v, p| list(v, p, column))?,
        comment: fields.optional("comment", string)?,
    })
}

fn position(value: &Value, path: &str) -> ValidationResult<Position> {
    let fields = Fields::object(value, path)?;

    Ok(Position {
        x: fields.required("x", number)?,
        y: fields.required("y", number)?,
    })
}

fn column(value: &Value, path: &str) -> ValidationResult<Column> {
    let fields = Fields::object(value, path)?;

    Ok(Column {
        id: fields.required("id", string)?,
        name: fields.required("name", string)?,
        column_type: fields.required("type", choice::<ColumnType>)?,
        length: fields.optional("length", integer)?,
        precision: fields.optional("precision", integer)?,
        scale: fields.optional("scale", integer)?,
        nullable: fields.defaulted("nullable", || true, boolean)?,
        primary_key: fields.defaulted("primary_key", || false, boolean)?,
        unique: fields.defaulted("unique", || false, boolean)?,
        auto_increment: fields.defaulted("auto_increment", || false, boolean)?,
        default_value: fields.optional("default_value", string)?,
        foreign_key: fields.optional("foreign_key", foreign_key)?,
        index: fields.defaulted("index", || false, boolean)?,
        comment: fields.optional("comment", string)?,
    })
}

fn foreign_key(value: &Value, path: &str) -> ValidationResult<ForeignKey> {
    let fields = Fields::object(value, path)?;

    Ok(ForeignKey {
        table: fields.required("table", string)?,
        column: fields.required("column", string)?,
        on_delete: fields.defaulted("on_delete", ReferentialAction::default, choice)?,
        on_update: fields.defaulted("on_update", ReferentialAction::default, choice)?,
    })
}

fn relationship(value: &Value, path: &str) -> ValidationResult<Relationship> {
    let fields = Fields::object(value, path)?;

    Ok(Relationship {
        id: fields.required("id", string)?,
        kind: fields.required("type", choice::<RelationshipKind>)?,
        from_table: fields.required("from_table", string)?,
        from_column: fields.required("from_column", string)?,
        to_table: fields.required("to_table", string)?,
        to_column: fields.required("to_column", string)?,
        label: fields.optional("label", string)?,
    })
}

fn index(value: &Value, path: &str) -> ValidationResult<Index> {
    let fields = Fields::object(value, path)?;

    Ok(Index {
        table: fields.required("table", string)?,
        columns: fields.required("columns", |v, p| list(v, p, string))?,
        kind: fields.defaulted("type", IndexKind::default, choice)?,
        name: fields.required("name", string)?,
    })
}

// ==================
// Scalar converters
// ==================

fn string(value: &Value, path: &str) -> ValidationResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(mismatch(path, "string", other)),
    }
}

fn integer(value: &Value, path: &str) -> ValidationResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| mismatch(path, "int", value))
}

fn number(value: &Value, path: &str) -> ValidationResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| mismatch(path, "number", value))
}

fn boolean(value: &Value, path: &str) -> ValidationResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(path, "bool", value))
}

fn choice<T: Literal>(value: &Value, path: &str) -> ValidationResult<T> {
    let s = value
        .as_str()
        .ok_or_else(|| mismatch(path, T::expected(), value))?;
    T::parse(s).ok_or_else(|| ValidationError::invalid_choice(path, T::expected(), s))
}

fn list<T>(
    value: &Value,
    path: &str,
    element: impl Fn(&Value, &str) -> ValidationResult<T>,
) -> ValidationResult<Vec<T>> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(path, "array", value))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| element(item, &format!("{}[{}]", path, i)))
        .collect()
}

/// Type mismatch, or a null-value error when the value is null.
fn mismatch(path: &str, expected: impl Into<String>, actual: &Value) -> ValidationError {
    if actual.is_null() {
        ValidationError::null_value(path, expected)
    } else {
        ValidationError::type_mismatch(path, expected, json_type_name(actual))
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
