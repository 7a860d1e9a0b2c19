//! SQL dialects: string-literal escaping and identifier quoting.
//!
//! Dialects never validate statements; they only make text safe to embed.


use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Words that always force identifier quoting, regardless of dialect.
const RESERVED_WORDS: &[&str] = &[
    "ALL", "AND", "AS", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN", "CONSTRAINT", "CREATE",
    "CROSS", "DEFAULT", "DELETE", "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FALSE", "FOR",
    "FOREIGN", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTO", "IS",
    "JOIN", "KEY", "LEFT", "LIKE", "MERGE", "NOT", "NULL", "ON", "OR", "ORDER", "OUTER",
    "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE", "UNION",
    "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

///
/// DialectError
///

#[derive(Debug, ThisError)]
pub enum DialectError {
    #[error("unknown SQL dialect '{0}'")]
    Unknown(String),
}

///
/// SqlDialect
///
/// Dialect-specific text rules used while rendering statements.
///

pub trait SqlDialect {
    fn name(&self) -> &'static str;

    /// Escape a display string for embedding inside a quoted literal.
    /// The surrounding quotes are not added here.
    fn escape_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Whether an unquoted identifier would be read back differently.
    fn needs_quoting(&self, name: &str) -> bool {
        !is_plain_identifier(name) || is_reserved_word(name)
    }

    /// Quote an identifier only when the dialect requires it.
    fn quote_identifier(&self, name: &str) -> String {
        if !self.needs_quoting(name) {
            return name.to_string();
        }

        let quote = self.identifier_quote();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }

    /// Render a possibly qualified object name.
    fn full_name(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn is_reserved_word(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_WORDS.binary_search(&upper.as_str()).is_ok()
}

// ─── ANSI ──────────────────────────────────────────────────────────────────

///
/// AnsiDialect
/// SQL-92 rules: `''` escaping and double-quoted identifiers.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ANSI"
    }
}

// ─── PostgreSQL ────────────────────────────────────────────────────────────

///
/// PostgresDialect
///
/// Unquoted identifiers fold to lower case, so any upper-case letter
/// forces quoting.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn needs_quoting(&self, name: &str) -> bool {
        !is_plain_identifier(name)
            || is_reserved_word(name)
            || name.chars().any(|ch| ch.is_ascii_uppercase())
    }
}

// ─── MySQL ─────────────────────────────────────────────────────────────────

///
/// MySqlDialect
/// Backslash is an escape character inside MySQL string literals.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn escape_string(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("''"),
                '\0' => out.push_str("\\0"),
                _ => out.push(ch),
            }
        }
        out
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

///
/// DialectKind
/// Named built-in dialects, as selected by configuration.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[display("ansi")]
    Ansi,
    #[display("postgres")]
    Postgres,
    #[display("mysql")]
    #[serde(rename = "mysql")]
    MySql,
}

impl DialectKind {
    #[must_use]
    pub fn dialect(self) -> Box<dyn SqlDialect> {
        match self {
            Self::Ansi => Box::new(AnsiDialect),
            Self::Postgres => Box::new(PostgresDialect),
            Self::MySql => Box::new(MySqlDialect),
        }
    }
}

impl FromStr for DialectKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" | "sql92" => Ok(Self::Ansi),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            _ => Err(DialectError::Unknown(s.to_string())),
        }
    }
}
