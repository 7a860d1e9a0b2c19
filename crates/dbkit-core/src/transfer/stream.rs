use crate::{
    error::InternalError,
    model::{DataKind, Row},
    obs::sink::{self, MetricsEvent},
    transfer::{
        ColumnMeta, DateTimePattern, EntityMapping, PatternError, ResultSet, ResultSetMeta,
        StreamColumn,
    },
    value::Value,
};
use thiserror::Error as ThisError;

///
/// RowError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RowError {
    #[error("no stream row has been installed")]
    NoCurrentRow,

    #[error("column index {index} out of bounds ({count} mapped columns)")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("stream row has {found} values but {expected} columns are mapped")]
    LengthMismatch { expected: usize, found: usize },
}

///
/// ConversionOutcome
/// How a single read was resolved.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConversionOutcome {
    /// Raw value returned as-is (no conversion applies).
    Passthrough,
    /// Text parsed into a UTC timestamp.
    Converted,
    /// Blank text read as NULL.
    Blank,
    /// Text did not match the pattern; raw value returned.
    Rejected,
}

///
/// StreamResultSet
///
/// Single-row window over values pushed by an upstream producer. The
/// producer installs each row with `set_stream_row`; the adapter never
/// advances on its own. DATETIME columns holding text are converted on
/// read when a datetime format is configured.
///

#[derive(Clone, Debug)]
pub struct StreamResultSet {
    mapping: EntityMapping,
    datetime_format: Option<DateTimePattern>,
    row: Option<Row>,
}

impl StreamResultSet {
    #[must_use]
    pub const fn new(mapping: EntityMapping) -> Self {
        Self {
            mapping,
            datetime_format: None,
            row: None,
        }
    }

    pub fn with_datetime_format(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.set_datetime_format(Some(pattern))?;
        Ok(self)
    }

    /// Replace the datetime format. `None` disables conversion.
    pub fn set_datetime_format(&mut self, pattern: Option<&str>) -> Result<(), PatternError> {
        self.datetime_format = pattern.map(DateTimePattern::parse).transpose()?;
        Ok(())
    }

    #[must_use]
    pub const fn datetime_format(&self) -> Option<&DateTimePattern> {
        self.datetime_format.as_ref()
    }

    #[must_use]
    pub fn columns(&self) -> &[StreamColumn] {
        self.mapping.columns()
    }

    #[must_use]
    pub const fn mapping(&self) -> &EntityMapping {
        &self.mapping
    }

    /// Install the next row, replacing the previous one wholesale.
    pub fn set_stream_row(&mut self, row: Row) -> Result<(), RowError> {
        let expected = self.mapping.len();
        if row.len() != expected {
            return Err(RowError::LengthMismatch {
                expected,
                found: row.len(),
            });
        }
        self.row = Some(row);

        Ok(())
    }

    #[must_use]
    pub const fn current_row(&self) -> Option<&Row> {
        self.row.as_ref()
    }

    fn read(&self, index: usize) -> Result<(Value, ConversionOutcome), RowError> {
        let column = self.mapping.column(index).ok_or(RowError::IndexOutOfBounds {
            index,
            count: self.mapping.len(),
        })?;
        let row = self.row.as_ref().ok_or(RowError::NoCurrentRow)?;
        let raw = row.get(index).ok_or(RowError::IndexOutOfBounds {
            index,
            count: row.len(),
        })?;

        let pattern = match &self.datetime_format {
            Some(pattern)
                if column.data_kind() == DataKind::Datetime
                    && !raw.is_null()
                    && !raw.is_temporal() =>
            {
                pattern
            }
            _ => return Ok((raw.clone(), ConversionOutcome::Passthrough)),
        };

        let text = raw.to_string();
        let text = text.trim();
        if text.is_empty() {
            return Ok((Value::Null, ConversionOutcome::Blank));
        }

        match pattern.parse_instant(text) {
            Ok(instant) => Ok((Value::Timestamp(instant), ConversionOutcome::Converted)),
            Err(err) => {
                tracing::debug!(
                    column = column.name(),
                    value = text,
                    pattern = pattern.as_str(),
                    error = %err,
                    "datetime conversion failed, keeping raw value"
                );
                Ok((raw.clone(), ConversionOutcome::Rejected))
            }
        }
    }
}

impl ResultSet for StreamResultSet {
    fn attribute_value(&self, index: usize) -> Result<Value, InternalError> {
        let (value, outcome) = self.read(index)?;
        sink::record(MetricsEvent::ValueRead { outcome });

        Ok(value)
    }

    fn meta(&self) -> ResultSetMeta {
        let columns = self
            .mapping
            .columns()
            .iter()
            .map(|col| ColumnMeta {
                ordinal: col.ordinal(),
                name: col.name().to_string(),
                data_kind: col.data_kind(),
            })
            .collect();

        ResultSetMeta { columns }
    }
}
