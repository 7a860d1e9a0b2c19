use crate::{model::Attribute, value::Value};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

///
/// DisplayFormat
///
/// Ui      → human-facing rendering (grid cells).
/// Edit    → rendering used by inline editors.
/// Native  → canonical form suitable for embedding in SQL text.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    Ui,
    Edit,
    #[default]
    Native,
}

///
/// ValueDisplay
/// Renders a typed value as text for a given attribute.
///

pub trait ValueDisplay {
    fn display_string(&self, attribute: &Attribute, value: &Value, format: DisplayFormat)
    -> String;
}

///
/// DefaultValueDisplay
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultValueDisplay;

impl ValueDisplay for DefaultValueDisplay {
    fn display_string(
        &self,
        _attribute: &Attribute,
        value: &Value,
        format: DisplayFormat,
    ) -> String {
        match (value, format) {
            (Value::Null, DisplayFormat::Native) => "NULL".to_string(),
            (Value::Null, _) => String::new(),
            (Value::Timestamp(ts), DisplayFormat::Ui) => {
                ts.format("%Y-%m-%d %H:%M:%S").to_string()
            }
            (Value::Timestamp(ts), _) => ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            (Value::Blob(bytes), DisplayFormat::Native) => {
                let mut out = String::with_capacity(2 + bytes.len() * 2);
                out.push_str("0x");
                for byte in bytes {
                    let _ = write!(out, "{byte:02X}");
                }
                out
            }
            (other, _) => other.to_string(),
        }
    }
}
