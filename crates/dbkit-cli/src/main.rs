//! Developer CLI for dbkit: list statement kinds, generate SQL from a JSON
//! schema, and push JSON rows through the stream result-set adapter.

mod error;
mod schema;

use crate::{
    error::CliError,
    schema::{SchemaFile, json_to_row, row_to_json},
};
use clap::{Parser, Subcommand, ValueEnum};
use dbkit::{
    core::{error::InternalError, generate::WriterSink},
    prelude::*,
};
use dbkit_config::{Config, DialectSetting, DisplayFormatSetting};
use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dbkit")]
#[command(about = "SQL statement generation and stream import tools", long_about = None)]
struct Args {
    /// Path to dbkit.toml. Defaults apply when omitted.
    #[arg(long, global = true, env = "DBKIT_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the statement kinds offered for a selection.
    Statements {
        #[arg(long, value_enum)]
        selection: SelectionArg,
    },
    /// Print generated SQL for an entity.
    Generate {
        /// JSON schema file describing the entity.
        #[arg(long)]
        schema: PathBuf,
        /// Statement kind (select, select_by_key, insert, update, delete, delete_by_key, merge).
        #[arg(long)]
        kind: StatementKind,
        /// JSON file holding an array of rows; switches to row-driven generation.
        #[arg(long)]
        rows: Option<PathBuf>,
    },
    /// Read JSON-lines rows through the stream adapter and print typed values.
    Import {
        #[arg(long)]
        schema: PathBuf,
        /// One JSON array per line.
        #[arg(long)]
        rows: PathBuf,
        /// Overrides transfer.datetime_format from the config file.
        #[arg(long)]
        datetime_format: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SelectionArg {
    Table,
    Rows,
}

impl From<SelectionArg> for SelectionKind {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Table => Self::TableSelected,
            SelectionArg::Rows => Self::ResultRowsSelected,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(Args::parse(), &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, out: &mut dyn Write) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            Config::load(path)?
        }
        None => Config::default(),
    };

    match args.command {
        Command::Statements { selection } => list_statements(selection.into(), out),
        Command::Generate { schema, kind, rows } => {
            generate(&config, &schema, kind, rows.as_deref(), out)
        }
        Command::Import {
            schema,
            rows,
            datetime_format,
        } => {
            let format = datetime_format.or(config.transfer.datetime_format);
            import(&schema, &rows, format.as_deref(), out)
        }
    }
}

fn list_statements(selection: SelectionKind, out: &mut dyn Write) -> Result<(), CliError> {
    for kind in selection.statements() {
        writeln!(out, "{kind}\t{}", kind.label())?;
    }

    Ok(())
}

fn generate(
    config: &Config,
    schema: &Path,
    kind: StatementKind,
    rows: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let entity = read_schema(schema)?;
    let rows = rows
        .map(|path| read_row_selection(path, &entity))
        .transpose()?;

    let dialect = match config.generate.dialect {
        DialectSetting::Ansi => Some(DialectKind::Ansi),
        DialectSetting::Postgres => Some(DialectKind::Postgres),
        DialectSetting::Mysql => Some(DialectKind::MySql),
        DialectSetting::None => None,
    };
    let format = match config.generate.display_format {
        DisplayFormatSetting::Ui => DisplayFormat::Ui,
        DisplayFormatSetting::Edit => DisplayFormat::Edit,
        DisplayFormatSetting::Native => DisplayFormat::Native,
    };

    let mut sink = WriterSink::new(out);
    Generator::new(dialect, format).generate_into(
        kind,
        &entity,
        rows.as_ref(),
        &mut [&mut sink],
    )?;

    Ok(())
}

fn import(
    schema: &Path,
    rows: &Path,
    datetime_format: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let entity = read_schema(schema)?;
    let file = fs::File::open(rows).map_err(|source| CliError::Read {
        path: rows.display().to_string(),
        source,
    })?;

    let mut producer = BufReader::new(file)
        .lines()
        .enumerate()
        .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
        .map(|(index, line)| {
            let line_no = index + 1;
            let text = line.map_err(|err| {
                InternalError::interface_internal(format!("line {line_no}: {err}"))
            })?;
            let json = serde_json::from_str(&text).map_err(|err| {
                InternalError::interface_internal(format!("line {line_no}: {err}"))
            })?;

            json_to_row(json)
                .map_err(|err| InternalError::interface_internal(format!("line {line_no}: {err}")))
        });

    let mut importer = Importer::for_entity(&entity, datetime_format)?;
    let columns = importer.result_set().columns().to_vec();

    let mut write_error = None;
    importer.run(&mut producer, |values| {
        if write_error.is_none()
            && let Err(err) = writeln!(out, "{}", row_to_json(&columns, values))
        {
            write_error = Some(err);
        }
    })?;

    match write_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn read_schema(path: &Path) -> Result<Entity, CliError> {
    read_json::<SchemaFile>(path)?.into_entity()
}

fn read_row_selection(path: &Path, entity: &Entity) -> Result<RowSelection, CliError> {
    let rows = read_json::<Vec<serde_json::Value>>(path)?
        .into_iter()
        .map(json_to_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RowSelection::positional(entity.attribute_slice(), rows))
}
