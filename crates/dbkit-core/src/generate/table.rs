use crate::{
    MERGE_SOURCE_TABLE,
    generate::{ResolvedAttributes, SqlGenerator, literal},
    model::Attribute,
};

///
/// TableRenderer
/// Renders statements from table metadata alone, using default literals.
///

pub(super) struct TableRenderer<'a> {
    pub(super) generator: &'a SqlGenerator,
    pub(super) table: String,
    pub(super) attrs: &'a ResolvedAttributes,
}

impl TableRenderer<'_> {
    pub(super) fn select(&self) -> String {
        let mut sql = String::with_capacity(100);
        sql.push_str("SELECT ");
        self.generator.push_names(&mut sql, self.attrs.all.iter());
        sql.push_str("\nFROM ");
        sql.push_str(&self.table);
        sql.push_str(";\n");
        sql
    }

    pub(super) fn insert(&self) -> String {
        let mut sql = String::with_capacity(100);
        sql.push_str("INSERT INTO ");
        sql.push_str(&self.table);
        sql.push_str("\n(");
        self.generator.push_names(&mut sql, self.attrs.all.iter());
        sql.push_str(")\nVALUES(");
        for (i, attr) in self.attrs.all.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            literal::push_default(&mut sql, attr);
        }
        sql.push_str(");\n");
        sql
    }

    pub(super) fn update(&self) -> String {
        let mut sql = String::with_capacity(100);
        sql.push_str("UPDATE ");
        sql.push_str(&self.table);
        sql.push_str("\nSET ");
        self.push_assignments(&mut sql, self.attrs.value_attributes(), ", ");

        if !self.attrs.key.is_empty() {
            sql.push_str("\nWHERE ");
            self.push_assignments(&mut sql, self.attrs.key.iter(), " AND ");
        }
        sql.push_str(";\n");
        sql
    }

    pub(super) fn delete(&self) -> String {
        let mut sql = String::with_capacity(100);
        sql.push_str("DELETE FROM ");
        sql.push_str(&self.table);
        sql.push_str("\nWHERE ");
        self.push_assignments(&mut sql, self.attrs.predicate_attributes(), " AND ");
        sql.push_str(";\n");
        sql
    }

    // The ON clause disappears without a key, the WHEN clauses never do.
    pub(super) fn merge(&self) -> String {
        let mut sql = String::with_capacity(200);
        sql.push_str("MERGE INTO ");
        sql.push_str(&self.table);
        sql.push_str(" AS tgt\n");
        sql.push_str("USING ");
        sql.push_str(MERGE_SOURCE_TABLE);
        sql.push_str(" AS src\n");

        if !self.attrs.key.is_empty() {
            sql.push_str("ON (");
            self.push_pairs(&mut sql, self.attrs.key.iter(), " AND ");
            sql.push_str(")\n");
        }

        sql.push_str("WHEN MATCHED\nTHEN UPDATE SET\n");
        self.push_pairs(&mut sql, self.attrs.value_attributes(), ", ");

        sql.push_str("\nWHEN NOT MATCHED\nTHEN INSERT (");
        for (i, attr) in self.attrs.all.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.generator.quoted_identifier(attr));
        }
        sql.push_str(")\nVALUES (");
        for (i, attr) in self.attrs.all.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("src.");
            sql.push_str(&self.generator.quoted_identifier(attr));
        }
        sql.push_str(");\n");
        sql
    }

    // `name=<default literal>` joined by `sep`.
    fn push_assignments<'b>(
        &self,
        sql: &mut String,
        attrs: impl IntoIterator<Item = &'b Attribute>,
        sep: &str,
    ) {
        for (i, attr) in attrs.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(sep);
            }
            sql.push_str(&self.generator.attribute_name(attr));
            sql.push('=');
            literal::push_default(sql, attr);
        }
    }

    // `tgt.name=src.name` joined by `sep`.
    fn push_pairs<'b>(
        &self,
        sql: &mut String,
        attrs: impl IntoIterator<Item = &'b Attribute>,
        sep: &str,
    ) {
        for (i, attr) in attrs.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(sep);
            }
            let ident = self.generator.quoted_identifier(attr);
            sql.push_str("tgt.");
            sql.push_str(&ident);
            sql.push_str("=src.");
            sql.push_str(&ident);
        }
    }
}
