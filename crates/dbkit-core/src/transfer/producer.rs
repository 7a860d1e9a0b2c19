use crate::{error::InternalError, model::Row, transfer::StreamResultSet};

///
/// StreamRowProducer
///
/// Upstream source of rows (a file reader, a decoder). The producer owns
/// how rows are obtained; the adapter only ever holds the latest one.
///

pub trait StreamRowProducer {
    fn next_row(&mut self) -> Option<Result<Row, InternalError>>;
}

impl<I> StreamRowProducer for I
where
    I: Iterator<Item = Result<Row, InternalError>>,
{
    fn next_row(&mut self) -> Option<Result<Row, InternalError>> {
        self.next()
    }
}

/// Drive `producer` to exhaustion, installing each row into `result_set`
/// and handing the adapter to `consume`.
///
/// The first producer, row-shape, or consumer failure stops the transfer.
/// Returns the number of rows consumed.
pub fn transfer_rows<P, F>(
    producer: &mut P,
    result_set: &mut StreamResultSet,
    mut consume: F,
) -> Result<u64, InternalError>
where
    P: StreamRowProducer + ?Sized,
    F: FnMut(&StreamResultSet) -> Result<(), InternalError>,
{
    let mut rows = 0u64;
    while let Some(row) = producer.next_row() {
        result_set.set_stream_row(row?)?;
        consume(result_set)?;
        rows += 1;
    }

    tracing::debug!(rows, entity = %result_set.mapping().target(), "stream transfer finished");

    Ok(rows)
}
