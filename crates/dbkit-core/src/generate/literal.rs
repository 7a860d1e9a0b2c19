use crate::{
    dialect::SqlDialect,
    model::{Attribute, DataKind},
    value::{DisplayFormat, Value, ValueDisplay},
};

/// Append the literal used when no concrete value is available.
///
/// A non-empty schema default is emitted verbatim and is still followed by
/// the data-kind placeholder, so `DEFAULT 5` on a numeric column renders `50`.
pub(crate) fn push_default(sql: &mut String, attr: &Attribute) {
    if let Some(default) = attr.default_value() {
        sql.push_str(default);
    }
    sql.push_str(attr.data_kind().placeholder());
}

/// Append a concrete row value.
///
/// NULL renders as the bare keyword. Only STRING attributes are quoted;
/// every other kind is embedded as its display string.
pub(crate) fn push_value(
    sql: &mut String,
    attr: &Attribute,
    value: &Value,
    dialect: Option<&dyn SqlDialect>,
    display: &dyn ValueDisplay,
    format: DisplayFormat,
) {
    if value.is_null() {
        sql.push_str("NULL");
        return;
    }

    let is_string = attr.data_kind() == DataKind::String;
    let display_string = display.display_string(attr, value, format);

    if is_string {
        sql.push('\'');
    }
    match dialect {
        Some(dialect) => sql.push_str(&dialect.escape_string(&display_string)),
        None => sql.push_str(&display_string),
    }
    if is_string {
        sql.push('\'');
    }
}
