use crate::Error;
use dbkit_core::{
    dialect::DialectKind,
    generate::{GenerateAction, RowSelection, SqlGenerator, StatementKind, TextSink},
    model::{Entity, EntityMetadata},
    transfer::{EntityMapping, ResultSet, StreamResultSet, StreamRowProducer, transfer_rows},
    value::{DisplayFormat, Value},
};

///
/// Generator
///
/// Public entrypoint for SQL generation. Wraps the core generator and
/// maps failures onto the public error taxonomy.
///

pub struct Generator {
    inner: SqlGenerator,
}

impl Generator {
    /// `dialect: None` emits identifiers and literals unescaped.
    #[must_use]
    pub fn new(dialect: Option<DialectKind>, format: DisplayFormat) -> Self {
        let mut inner = SqlGenerator::new().with_format(format);
        if let Some(kind) = dialect {
            inner = inner.with_dialect(kind.dialect());
        }

        Self { inner }
    }

    #[must_use]
    pub const fn core(&self) -> &SqlGenerator {
        &self.inner
    }

    pub fn generate(
        &self,
        kind: StatementKind,
        entity: &dyn EntityMetadata,
        rows: Option<&RowSelection>,
    ) -> Result<String, Error> {
        self.inner.generate(kind, entity, rows).map_err(Error::from)
    }

    /// Generate and hand the text to every sink.
    pub fn generate_into(
        &self,
        kind: StatementKind,
        entity: &dyn EntityMetadata,
        rows: Option<&RowSelection>,
        sinks: &mut [&mut dyn TextSink],
    ) -> Result<String, Error> {
        GenerateAction::new(kind, &self.inner)
            .run(entity, rows, sinks)
            .map_err(Error::from)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(None, DisplayFormat::default())
    }
}

///
/// Importer
///
/// Drives a row producer through a `StreamResultSet` and yields every row
/// as typed values, in column order.
///

pub struct Importer {
    result_set: StreamResultSet,
}

impl Importer {
    pub fn new(mapping: EntityMapping, datetime_format: Option<&str>) -> Result<Self, Error> {
        let mut result_set = StreamResultSet::new(mapping);
        result_set.set_datetime_format(datetime_format)?;

        Ok(Self { result_set })
    }

    /// Map every attribute of `entity` to the stream column at the same position.
    pub fn for_entity(entity: &Entity, datetime_format: Option<&str>) -> Result<Self, Error> {
        Self::new(EntityMapping::from_entity(entity), datetime_format)
    }

    #[must_use]
    pub const fn result_set(&self) -> &StreamResultSet {
        &self.result_set
    }

    /// Returns the number of rows imported.
    pub fn run<P>(&mut self, producer: &mut P, mut on_row: impl FnMut(Vec<Value>)) -> Result<u64, Error>
    where
        P: StreamRowProducer + ?Sized,
    {
        let columns = self.result_set.columns().len();
        let rows = transfer_rows(producer, &mut self.result_set, |rs| {
            let values = (0..columns)
                .map(|index| rs.attribute_value(index))
                .collect::<Result<Vec<_>, _>>()?;
            on_row(values);

            Ok(())
        })?;

        tracing::info!(rows, "import finished");

        Ok(rows)
    }
}

impl Drop for Importer {
    fn drop(&mut self) {
        self.result_set.close();
    }
}
