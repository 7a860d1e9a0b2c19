use crate::error::CliError;
use dbkit::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Number, Value as Json};

///
/// SchemaFile
///
/// JSON description of one entity:
///
/// ```json
/// { "name": "EMPLOYEE", "schema": "hr",
///   "attributes": [{ "name": "ID", "kind": "numeric", "key": true }] }
/// ```
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub catalog: Option<String>,
    pub attributes: Vec<AttributeDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDef {
    pub name: String,
    pub kind: DataKind,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub key: bool,
}

impl SchemaFile {
    pub fn into_entity(self) -> Result<Entity, CliError> {
        let mut name = EntityName::new(self.name);
        if let Some(schema) = self.schema {
            name = name.in_schema(schema);
        }
        if let Some(catalog) = self.catalog {
            name = name.in_catalog(catalog);
        }

        let attributes = self
            .attributes
            .into_iter()
            .enumerate()
            .map(|(ordinal, def)| {
                let mut attr = Attribute::new(def.name, ordinal, def.kind);
                if let Some(default) = def.default {
                    attr = attr.with_default(default);
                }
                if def.key {
                    attr = attr.in_unique_key();
                }
                attr
            })
            .collect();

        Entity::new(name, attributes).map_err(|err| CliError::Schema(err.to_string()))
    }
}

/// Convert one JSON cell into a runtime value.
///
/// Strings stay text; typing DATETIME text is the adapter's job.
pub fn json_to_value(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => number_to_value(&n),
        Json::String(s) => Value::Text(s),
        nested @ (Json::Array(_) | Json::Object(_)) => Value::Text(nested.to_string()),
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if n.is_f64()
        && let Some(f) = n.as_f64()
    {
        Value::Float64(f)
    } else {
        Value::Decimal(n.to_string())
    }
}

/// One JSON array of cells into a row.
pub fn json_to_row(json: Json) -> Result<Row, CliError> {
    match json {
        Json::Array(cells) => Ok(cells.into_iter().map(json_to_value).collect()),
        other => Err(CliError::Rows(format!("expected a JSON array, got {other}"))),
    }
}

/// Render a row as a JSON object keyed by column name.
pub fn row_to_json(columns: &[StreamColumn], values: Vec<Value>) -> Json {
    let object: Map<String, Json> = columns
        .iter()
        .zip(values)
        .map(|(column, value)| (column.name().to_string(), value_to_json(value)))
        .collect();

    Json::Object(object)
}

fn value_to_json(value: Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Int(i) => Json::from(i),
        Value::Float64(f) => Number::from_f64(f).map_or(Json::Null, Json::Number),
        other => Json::String(other.to_string()),
    }
}
