use crate::{
    error::InternalError,
    generate::{RowSelection, SqlGenerator, StatementKind},
    model::EntityMetadata,
};
use std::{io, ops::Range};

///
/// TextSink
/// Opaque destination for generated SQL (editor selection, clipboard, stdout).
///

pub trait TextSink {
    fn accept(&mut self, text: &str) -> Result<(), InternalError>;
}

/// Hand `text` to every sink.
///
/// A failing sink is logged and skipped; the remaining sinks still receive
/// the text. Returns how many sinks accepted it.
pub fn deliver(text: &str, sinks: &mut [&mut dyn TextSink]) -> usize {
    let mut delivered = 0;
    for sink in sinks.iter_mut() {
        match sink.accept(text) {
            Ok(()) => delivered += 1,
            Err(err) => {
                tracing::warn!(error = %err.display_with_class(), "failed to deliver generated sql");
            }
        }
    }

    delivered
}

///
/// GenerateAction
///
/// One menu entry: generate a statement kind and push the text to the
/// sinks. If generation fails nothing is delivered.
///

pub struct GenerateAction<'a> {
    kind: StatementKind,
    generator: &'a SqlGenerator,
}

impl<'a> GenerateAction<'a> {
    #[must_use]
    pub const fn new(kind: StatementKind, generator: &'a SqlGenerator) -> Self {
        Self { kind, generator }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn run(
        &self,
        entity: &dyn EntityMetadata,
        rows: Option<&RowSelection>,
        sinks: &mut [&mut dyn TextSink],
    ) -> Result<String, InternalError> {
        let sql = self.generator.generate(self.kind, entity, rows)?;
        deliver(&sql, sinks);

        Ok(sql)
    }
}

///
/// EditorBuffer
///
/// In-memory text document with a selection. Accepting text replaces the
/// selection and leaves an empty selection right after the inserted text.
///

#[derive(Clone, Debug, Default)]
pub struct EditorBuffer {
    text: String,
    selection: Range<usize>,
}

impl EditorBuffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();

        Self {
            text,
            selection: end..end,
        }
    }

    /// Select a byte range. Bounds are checked when text is accepted.
    pub const fn select(&mut self, range: Range<usize>) {
        self.selection = range;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }
}

impl TextSink for EditorBuffer {
    fn accept(&mut self, text: &str) -> Result<(), InternalError> {
        let Range { start, end } = self.selection;
        if start > end
            || end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return Err(InternalError::interface_internal(format!(
                "selection {start}..{end} is outside the document ({} bytes)",
                self.text.len()
            )));
        }

        self.text.replace_range(start..end, text);
        let caret = start + text.len();
        self.selection = caret..caret;

        Ok(())
    }
}

///
/// WriterSink
/// Writes generated text to any `io::Write` (stdout, files).
///

pub struct WriterSink<W: io::Write> {
    writer: W,
}

impl<W: io::Write> WriterSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> TextSink for WriterSink<W> {
    fn accept(&mut self, text: &str) -> Result<(), InternalError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|err| InternalError::interface_internal(format!("write failed: {err}")))
    }
}
