//! CLI argument definitions for `savtab`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "savtab",
    version,
    about = "Inspect SAV source dumps as entity/variable/value tables",
    long_about = "Adapt a statistical file dump into an entity/variable/value table.\n\n\
                  One variable identifies entities. When an identifier repeats across\n\
                  rows the table is multiline and variables yield value sequences."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the table variables with their types, labels and categories.
    Variables(TableArgs),

    /// List the entities and the rows each one occupies.
    Entities(TableArgs),

    /// Print the value set of every entity, or of a single one.
    Values(ValuesArgs),
}

/// Source dump and table options shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct TableArgs {
    /// Path to the JSON source dump.
    #[arg(value_name = "DUMP")]
    pub dump: PathBuf,

    /// JSON file of table options (entity_type, locale, id_variable, multilines).
    ///
    /// Flags given on the command line override values from this file.
    #[arg(long = "options", value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Entity type of the table's entities (default: Participant).
    #[arg(long = "entity-type", value_name = "TYPE")]
    pub entity_type: Option<String>,

    /// Locale tag attached to labels.
    #[arg(long = "locale", value_name = "TAG")]
    pub locale: Option<String>,

    /// Identifier variable name (default: the first variable).
    #[arg(long = "id-variable", value_name = "NAME")]
    pub id_variable: Option<String>,

    /// Treat the table as multiline even when no identifier repeats.
    #[arg(long = "multilines")]
    pub multilines: bool,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Only print the value set of this entity identifier.
    #[arg(long = "entity", value_name = "ID")]
    pub entity: Option<String>,
}

/// Rendering of command output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Bordered table for terminals.
    #[default]
    Table,
    /// Tab-separated lines with a header.
    Tsv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
