//! SQL statement generator.
//!
//! Renders SELECT/INSERT/UPDATE/DELETE/MERGE text for an entity, either from
//! metadata alone or once per selected result row. Output is plain text;
//! nothing here executes or validates SQL.

mod deliver;
mod kind;
mod literal;
mod rows;
mod table;

#[cfg(test)]
mod tests;

use crate::{
    dialect::SqlDialect,
    error::InternalError,
    model::{Attribute, EntityMetadata},
    obs::sink::{self, MetricsEvent},
    value::{DefaultValueDisplay, DisplayFormat, ValueDisplay},
};
use rows::RowRenderer;
use table::TableRenderer;

// re-exports
pub use deliver::{EditorBuffer, GenerateAction, TextSink, WriterSink, deliver};
pub use kind::{Selection, SelectionKind, StatementKind, UnknownStatementKind};
pub use rows::{AttributeBinding, RowSelection};

/// Attributes of `all` that are not part of `key`.
///
/// With an empty key every attribute is a value attribute.
#[must_use]
pub fn value_attributes<'a>(all: &'a [Attribute], key: &[Attribute]) -> Vec<&'a Attribute> {
    all.iter().filter(|attr| !key.contains(attr)).collect()
}

///
/// ResolvedAttributes
/// Attribute and key lookups, resolved once per generation request.
///

#[derive(Clone, Debug)]
pub struct ResolvedAttributes {
    pub all: Vec<Attribute>,
    pub key: Vec<Attribute>,
}

impl ResolvedAttributes {
    pub fn resolve(entity: &dyn EntityMetadata) -> Result<Self, InternalError> {
        let all = entity.attributes()?;
        let key = entity.unique_key()?;

        if let Some(stray) = key.iter().find(|attr| !all.contains(attr)) {
            return Err(InternalError::generate_invariant(format!(
                "key attribute '{}' is not an attribute of {}",
                stray.name(),
                entity.name()
            )));
        }

        Ok(Self { all, key })
    }

    #[must_use]
    pub fn value_attributes(&self) -> Vec<&Attribute> {
        value_attributes(&self.all, &self.key)
    }

    /// Key attributes, or every attribute when no key is known.
    #[must_use]
    pub fn predicate_attributes(&self) -> &[Attribute] {
        if self.key.is_empty() {
            &self.all
        } else {
            &self.key
        }
    }
}

///
/// SqlGenerator
///
/// Holds the rendering policy (dialect, value display, display format).
/// Without a dialect identifiers and literals are emitted raw.
///

pub struct SqlGenerator {
    dialect: Option<Box<dyn SqlDialect>>,
    display: Box<dyn ValueDisplay>,
    format: DisplayFormat,
}

impl Default for SqlGenerator {
    fn default() -> Self {
        Self {
            dialect: None,
            display: Box::new(DefaultValueDisplay),
            format: DisplayFormat::Native,
        }
    }
}

impl SqlGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Box<dyn SqlDialect>) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: Box<dyn ValueDisplay>) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn dialect(&self) -> Option<&dyn SqlDialect> {
        self.dialect.as_deref()
    }

    pub(crate) fn display(&self) -> &dyn ValueDisplay {
        self.display.as_ref()
    }

    pub(crate) const fn format(&self) -> DisplayFormat {
        self.format
    }

    /// Render `kind` for `entity`.
    ///
    /// `rows` switches to result-set-driven generation: one statement per
    /// selected row. Any metadata failure aborts the whole request and no
    /// partial text is returned.
    pub fn generate(
        &self,
        kind: StatementKind,
        entity: &dyn EntityMetadata,
        rows: Option<&RowSelection>,
    ) -> Result<String, InternalError> {
        sink::record(MetricsEvent::GenerateStart { kind });

        match self.generate_inner(kind, entity, rows) {
            Ok(sql) => {
                let statements = rows.map_or(1, |selection| selection.rows().len() as u64);
                sink::record(MetricsEvent::GenerateFinish { kind, statements });
                Ok(sql)
            }
            Err(err) => {
                sink::record(MetricsEvent::GenerateFailed { kind });
                Err(err)
            }
        }
    }

    fn generate_inner(
        &self,
        kind: StatementKind,
        entity: &dyn EntityMetadata,
        rows: Option<&RowSelection>,
    ) -> Result<String, InternalError> {
        match rows {
            None if !kind.supports_table() => {
                return Err(InternalError::generate_unsupported(format!(
                    "{} requires selected result rows",
                    kind.label()
                )));
            }
            Some(_) if !kind.supports_rows() => {
                return Err(InternalError::generate_unsupported(format!(
                    "{} cannot be generated from result rows",
                    kind.label()
                )));
            }
            _ => {}
        }

        let attrs = ResolvedAttributes::resolve(entity)?;
        let table = self.table_name(entity);

        let Some(selection) = rows else {
            let renderer = TableRenderer {
                generator: self,
                table,
                attrs: &attrs,
            };

            return Ok(match kind {
                StatementKind::Select => renderer.select(),
                StatementKind::Insert => renderer.insert(),
                StatementKind::Update => renderer.update(),
                StatementKind::Delete => renderer.delete(),
                StatementKind::Merge => renderer.merge(),
                StatementKind::SelectByKey | StatementKind::DeleteByKey => {
                    return Err(InternalError::generate_invariant(format!(
                        "{} reached table rendering",
                        kind.label()
                    )));
                }
            });
        };

        let renderer = RowRenderer {
            generator: self,
            table,
            attrs: &attrs,
            selection,
        };

        match kind {
            StatementKind::SelectByKey => renderer.select_by_key(),
            StatementKind::Insert => renderer.insert(),
            StatementKind::DeleteByKey => renderer.delete_by_key(),
            StatementKind::Select
            | StatementKind::Update
            | StatementKind::Delete
            | StatementKind::Merge => Err(InternalError::generate_invariant(format!(
                "{} reached row rendering",
                kind.label()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Naming
    // ------------------------------------------------------------------

    fn table_name(&self, entity: &dyn EntityMetadata) -> String {
        let name = entity.name();
        match self.dialect() {
            Some(dialect) => dialect.full_name(&name.parts()),
            None => name.to_string(),
        }
    }

    /// Display name of an attribute, as used outside MERGE.
    pub(crate) fn attribute_name(&self, attr: &Attribute) -> String {
        match self.dialect() {
            Some(dialect) => dialect.full_name(&[attr.name()]),
            None => attr.name().to_string(),
        }
    }

    /// Quoted-identifier form, as used by MERGE.
    pub(crate) fn quoted_identifier(&self, attr: &Attribute) -> String {
        match self.dialect() {
            Some(dialect) => dialect.quote_identifier(attr.name()),
            None => attr.name().to_string(),
        }
    }

    pub(crate) fn push_names<'a>(
        &self,
        sql: &mut String,
        attrs: impl IntoIterator<Item = &'a Attribute>,
    ) {
        for (i, attr) in attrs.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.attribute_name(attr));
        }
    }
}
