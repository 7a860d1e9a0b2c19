use crate::{
    error::InternalError,
    generate::{ResolvedAttributes, SqlGenerator, literal},
    model::{Attribute, Row},
};

///
/// AttributeBinding
/// Links an entity attribute to a column of the result rows.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeBinding {
    attribute: String,
    column: usize,
}

impl AttributeBinding {
    #[must_use]
    pub fn new(attribute: impl Into<String>, column: usize) -> Self {
        Self {
            attribute: attribute.into(),
            column,
        }
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }
}

///
/// RowSelection
///
/// Rows selected in a result viewer, plus the bindings that tell which
/// attribute each column displays. Attributes without a binding fall
/// back to their default literal.
///

#[derive(Clone, Debug, Default)]
pub struct RowSelection {
    bindings: Vec<AttributeBinding>,
    rows: Vec<Row>,
}

impl RowSelection {
    #[must_use]
    pub const fn new(bindings: Vec<AttributeBinding>, rows: Vec<Row>) -> Self {
        Self { bindings, rows }
    }

    /// Bind every attribute of the entity to the column at the same position.
    #[must_use]
    pub fn positional(attributes: &[Attribute], rows: Vec<Row>) -> Self {
        let bindings = attributes
            .iter()
            .enumerate()
            .map(|(column, attr)| AttributeBinding::new(attr.name(), column))
            .collect();

        Self { bindings, rows }
    }

    #[must_use]
    pub fn binding(&self, attribute: &Attribute) -> Option<&AttributeBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.attribute == attribute.name())
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///
/// RowRenderer
/// Renders one statement block per selected row.
///

pub(super) struct RowRenderer<'a> {
    pub(super) generator: &'a SqlGenerator,
    pub(super) table: String,
    pub(super) attrs: &'a ResolvedAttributes,
    pub(super) selection: &'a RowSelection,
}

impl RowRenderer<'_> {
    pub(super) fn select_by_key(&self) -> Result<String, InternalError> {
        let mut sql = String::with_capacity(100);
        let value_attrs = self.attrs.value_attributes();
        let predicate = self.attrs.predicate_attributes();

        for row in self.selection.rows() {
            sql.push_str("SELECT ");
            self.generator
                .push_names(&mut sql, value_attrs.iter().copied());
            sql.push_str("\nFROM ");
            sql.push_str(&self.table);
            sql.push_str("\nWHERE ");
            self.push_predicate(&mut sql, predicate, row)?;
            sql.push_str(";\n");
        }

        Ok(sql)
    }

    pub(super) fn insert(&self) -> Result<String, InternalError> {
        let mut sql = String::with_capacity(100);

        for row in self.selection.rows() {
            sql.push_str("INSERT INTO ");
            sql.push_str(&self.table);
            sql.push_str("\n(");
            self.generator.push_names(&mut sql, self.attrs.all.iter());
            sql.push_str(")\nVALUES(");
            for (i, attr) in self.attrs.all.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                self.push_cell(&mut sql, attr, row)?;
            }
            sql.push_str(");\n");
        }

        Ok(sql)
    }

    pub(super) fn delete_by_key(&self) -> Result<String, InternalError> {
        let mut sql = String::with_capacity(100);
        let predicate = self.attrs.predicate_attributes();

        for row in self.selection.rows() {
            sql.push_str("DELETE FROM ");
            sql.push_str(&self.table);
            sql.push_str("\nWHERE ");
            self.push_predicate(&mut sql, predicate, row)?;
            sql.push_str(";\n");
        }

        Ok(sql)
    }

    fn push_predicate(
        &self,
        sql: &mut String,
        attrs: &[Attribute],
        row: &Row,
    ) -> Result<(), InternalError> {
        for (i, attr) in attrs.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&self.generator.attribute_name(attr));
            sql.push('=');
            self.push_cell(sql, attr, row)?;
        }

        Ok(())
    }

    // Bound attributes render the row's value; unbound ones their default.
    fn push_cell(&self, sql: &mut String, attr: &Attribute, row: &Row) -> Result<(), InternalError> {
        let Some(binding) = self.selection.binding(attr) else {
            literal::push_default(sql, attr);
            return Ok(());
        };

        let value = row.get(binding.column()).ok_or_else(|| {
            InternalError::generate_invariant(format!(
                "binding for '{}' points at column {} but the row has {} values",
                attr.name(),
                binding.column(),
                row.len()
            ))
        })?;

        literal::push_value(
            sql,
            attr,
            value,
            self.generator.dialect(),
            self.generator.display(),
            self.generator.format(),
        );

        Ok(())
    }
}
