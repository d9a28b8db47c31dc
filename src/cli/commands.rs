//! CLI commands and argument parsing

use crate::types::{DecodePolicy, LineTerminator, SplitKey};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CSV Terminal Interface: split delimited text files
#[derive(Parser, Debug)]
#[command(name = "coti")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Full path of the file to be worked on
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Job file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Encoding of the file (defaults to utf-8). A byte order mark in the
    /// source wins; UTF-16 chunks are written with one
    #[arg(short, long, global = true)]
    pub encoding: Option<String>,

    /// Delimiter used in the file (defaults to ','; use '\t' or 'tab' for TAB)
    #[arg(short, long, global = true)]
    pub delimiter: Option<String>,

    /// Directory for chunk files (defaults to the source directory)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Do not repeat the header at the top of each chunk
    #[arg(long, global = true, overrides_with = "keep_header")]
    pub no_header: bool,

    /// Repeat the header at the top of each chunk, even if the job file says not to
    #[arg(long, global = true, overrides_with = "no_header")]
    pub keep_header: bool,

    /// What to do with malformed or unmappable characters
    #[arg(long, global = true)]
    pub decode_errors: Option<DecodePolicy>,

    /// Record terminator for chunk files
    #[arg(long, global = true)]
    pub line_terminator: Option<LineTerminator>,

    /// Run summary format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split the file into chunks of at most N data rows
    Chunk {
        /// Data rows per chunk file (defaults to 5000)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        chunksize: Option<i64>,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },

    /// Split a field's list values into additional rows, keeping the other fields
    SplitField {
        /// Field to split, counted from 0
        #[arg(long = "field2split", allow_negative_numbers = true)]
        field: Option<i64>,

        /// Text that marks a field as holding several values
        #[arg(long)]
        field_delimiter: Option<String>,

        /// Keep only the rows that were split: "yes" or "no" (defaults to yes)
        #[arg(long)]
        split_field_only: Option<String>,

        /// How split fields are tokenized
        #[arg(long)]
        split_on: Option<SplitKey>,

        /// Input rows per chunk file (defaults to 5000)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        chunksize: Option<i64>,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },

    /// Run the operation named in the job file (--config)
    Run,
}

/// Field concatenation flags
#[derive(Args, Debug, Default, Clone)]
pub struct RewriteArgs {
    /// Field that receives the appended value, counted from 0
    #[arg(long, allow_negative_numbers = true)]
    pub rewrite_target: Option<i64>,

    /// Field whose value is appended, counted from 0
    #[arg(long, allow_negative_numbers = true)]
    pub rewrite_source: Option<i64>,

    /// Separator placed between the two values (defaults to '-')
    #[arg(long)]
    pub rewrite_separator: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Log lines only
    Text,
    /// JSON summary on one line
    Json,
    /// Pretty-printed JSON summary
    Pretty,
}
