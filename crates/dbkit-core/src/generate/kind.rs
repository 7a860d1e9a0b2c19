use crate::{generate::RowSelection, model::EntityMetadata};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// StatementKind
/// Closed set of statements the generator can render.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    #[display("select")]
    Select,
    #[display("select_by_key")]
    SelectByKey,
    #[display("insert")]
    Insert,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
    #[display("delete_by_key")]
    DeleteByKey,
    #[display("merge")]
    Merge,
}

impl StatementKind {
    pub const ALL: [Self; 7] = [
        Self::Select,
        Self::SelectByKey,
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::DeleteByKey,
        Self::Merge,
    ];

    /// Menu label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::SelectByKey => "SELECT by Unique Key",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::DeleteByKey => "DELETE by Unique Key",
            Self::Merge => "MERGE",
        }
    }

    /// Kinds that can be rendered from table metadata alone.
    #[must_use]
    pub const fn supports_table(self) -> bool {
        matches!(
            self,
            Self::Select | Self::Insert | Self::Update | Self::Delete | Self::Merge
        )
    }

    /// Kinds that can be rendered once per selected result row.
    #[must_use]
    pub const fn supports_rows(self) -> bool {
        matches!(self, Self::SelectByKey | Self::Insert | Self::DeleteByKey)
    }
}

///
/// UnknownStatementKind
///

#[derive(Debug, ThisError)]
#[error("unknown statement kind '{0}'")]
pub struct UnknownStatementKind(pub String);

impl FromStr for StatementKind {
    type Err = UnknownStatementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");

        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == normalized)
            .ok_or_else(|| UnknownStatementKind(s.to_string()))
    }
}

///
/// SelectionKind
/// What the user had selected when asking for SQL.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    TableSelected,
    ResultRowsSelected,
}

impl SelectionKind {
    /// Statement kinds offered for this kind of selection.
    #[must_use]
    pub const fn statements(self) -> &'static [StatementKind] {
        match self {
            Self::TableSelected => &[
                StatementKind::Select,
                StatementKind::Insert,
                StatementKind::Update,
                StatementKind::Delete,
                StatementKind::Merge,
            ],
            Self::ResultRowsSelected => &[
                StatementKind::SelectByKey,
                StatementKind::Insert,
                StatementKind::DeleteByKey,
            ],
        }
    }
}

///
/// Selection
/// Concrete selection context handed over by the host UI.
///

pub enum Selection<'a> {
    Table(&'a dyn EntityMetadata),
    ResultRows {
        /// Single source entity of the result set, when it can be determined.
        entity: Option<&'a dyn EntityMetadata>,
        rows: &'a RowSelection,
    },
}

impl Selection<'_> {
    #[must_use]
    pub const fn kind(&self) -> SelectionKind {
        match self {
            Self::Table(_) => SelectionKind::TableSelected,
            Self::ResultRows { .. } => SelectionKind::ResultRowsSelected,
        }
    }

    /// Statement kinds actually available for this selection.
    ///
    /// Result rows offer nothing when the source entity is unknown or no
    /// row is selected.
    #[must_use]
    pub fn available_statements(&self) -> Vec<StatementKind> {
        match self {
            Self::ResultRows { entity: None, .. } => Vec::new(),
            Self::ResultRows { rows, .. } if rows.is_empty() => Vec::new(),
            _ => self.kind().statements().to_vec(),
        }
    }
}
