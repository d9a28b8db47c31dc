//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, RewriteArgs};
use crate::config::{JobConfig, RewriteConfig, RunSettings, SplitConfig};
use crate::engine::{ChunkEngine, ChunkPlan, RunStats};
use crate::error::{Result, ResultExt};
use crate::output::{ChunkNaming, FileRotator};
use crate::store::RecordStore;
use crate::transform::RowPipeline;
use crate::types::Operation;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<RunStats> {
        let settings = self.settings()?;
        let stats = Self::execute(&settings)?;
        self.output_summary(&stats)?;
        Ok(stats)
    }

    /// Build validated settings from the job file and command-line flags.
    /// Flags take precedence over the job file.
    pub fn settings(&self) -> Result<RunSettings> {
        let base = match &self.cli.config {
            Some(path) => JobConfig::from_file(path)?,
            None => JobConfig::default(),
        };
        base.merge(self.overrides()).resolve()
    }

    /// Execute a validated run: read the source, then write its chunks
    pub fn execute(settings: &RunSettings) -> Result<RunStats> {
        let mut naming = ChunkNaming::from_source(&settings.source)?;
        if let Some(dir) = &settings.output_dir {
            naming = naming.with_directory(dir);
        }
        let plan = ChunkPlan::new(settings.chunk_size)?.with_keep_header(settings.keep_header);

        info!(
            "Working directory containing source file: {}",
            settings
                .source
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        info!("Source file: {}", settings.source.display());

        let store = RecordStore::load(&settings.source, &settings.format)?;

        let pipeline = RowPipeline::new()
            .with_rewrite(settings.rewrite.clone())
            .with_exploder(settings.exploder.clone());
        let engine = ChunkEngine::new(plan).with_pipeline(pipeline);
        let mut rotator = FileRotator::new(naming, settings.format);

        info!("Begin {}...", settings.operation);
        let stats = engine.run(&store, &mut rotator)?;

        if settings.operation == Operation::SplitField {
            info!("Number of rows identified for split: {}", stats.rows_split);
            info!(
                "Number of rows identified not for split: {}",
                stats.rows_passed + stats.rows_dropped
            );
        }
        info!("{} is done.", settings.operation);
        Ok(stats)
    }

    /// Translate command-line flags into a job config overlay
    fn overrides(&self) -> JobConfig {
        let (operation, chunk_size, split, rewrite) = match &self.cli.command {
            Commands::Chunk { chunksize, rewrite } => {
                (Some(Operation::Chunk), *chunksize, None, rewrite_config(rewrite))
            }
            Commands::SplitField {
                field,
                field_delimiter,
                split_field_only,
                split_on,
                chunksize,
                rewrite,
            } => (
                Some(Operation::SplitField),
                *chunksize,
                Some(SplitConfig {
                    field: *field,
                    field_delimiter: field_delimiter.clone(),
                    split_field_only: split_field_only.clone(),
                    split_on: *split_on,
                }),
                rewrite_config(rewrite),
            ),
            Commands::Run => (None, None, None, None),
        };

        JobConfig {
            operation: operation.map(|op| op.to_string()),
            file: self.cli.file.clone(),
            output_dir: self.cli.output_dir.clone(),
            chunk_size,
            keep_header: self.header_override(),
            encoding: self.cli.encoding.clone(),
            delimiter: self.cli.delimiter.clone(),
            decode_errors: self.cli.decode_errors,
            line_terminator: self.cli.line_terminator,
            split,
            rewrite,
        }
    }

    /// `--keep-header` and `--no-header` override each other; the last one given wins
    fn header_override(&self) -> Option<bool> {
        if self.cli.keep_header {
            Some(true)
        } else if self.cli.no_header {
            Some(false)
        } else {
            None
        }
    }

    /// Print the run summary
    fn output_summary(&self, stats: &RunStats) -> Result<()> {
        match self.cli.format {
            OutputFormat::Text => {}
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string(stats).context("Failed to render run summary")?
                );
            }
            OutputFormat::Pretty => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(stats).context("Failed to render run summary")?
                );
            }
        }
        Ok(())
    }
}

fn rewrite_config(args: &RewriteArgs) -> Option<RewriteConfig> {
    if args.rewrite_target.is_none()
        && args.rewrite_source.is_none()
        && args.rewrite_separator.is_none()
    {
        return None;
    }
    Some(RewriteConfig {
        target: args.rewrite_target,
        source: args.rewrite_source,
        separator: args.rewrite_separator.clone(),
    })
}
