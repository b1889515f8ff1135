//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::catalog::{DirCatalog, FileList};
use crate::adapters::csv_adapter::CsvLoader;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReporter;
use crate::domain::engine::{Aggregator, RunReport};
use crate::domain::error::StatsError;
use crate::domain::record::RowShape;
use crate::domain::settings::{AnalysisSettings, ExecutionMode};
use crate::ports::catalog_port::CatalogPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "decastat",
    about = "Decade-bucketed price and volatility statistics from daily price files"
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

/// How input files are read.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// INI config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Row layout: 6 (date,open,high,low,close,volume) or 7 (adds adj close)
    #[arg(long, value_parser = clap::value_parser!(i64).range(6..=7))]
    pub columns: Option<i64>,
    /// Accepted rows read per file (0 = all)
    #[arg(long)]
    pub max_rows: Option<usize>,
}

/// How file-level work is spread over threads.
#[derive(Args, Debug, Clone, Default)]
pub struct ScheduleArgs {
    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
    /// Files per task
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Process files one after another on the calling thread
    #[arg(long)]
    pub serial: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate every matching file in a directory
    Analyze {
        dir: PathBuf,
        /// File name suffix to pick up
        #[arg(long)]
        suffix: Option<String>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Aggregate an explicit list of files
    Files {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Split one file's rows over message-passing workers
    Rows {
        file: PathBuf,
        /// Number of row workers
        #[arg(short, long)]
        workers: Option<usize>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Validate a configuration file
    Validate {
        config: PathBuf,
    },
}

impl InputArgs {
    pub fn apply(&self, settings: &mut AnalysisSettings) {
        if let Some(shape) = self.columns.and_then(RowShape::from_columns) {
            settings.shape = shape;
        }
        if let Some(max_rows) = self.max_rows {
            settings.max_rows = (max_rows > 0).then_some(max_rows);
        }
    }
}

impl ScheduleArgs {
    pub fn apply(&self, settings: &mut AnalysisSettings) -> Result<(), StatsError> {
        if let Some(threads) = self.threads {
            settings.schedule.threads = (threads > 0).then_some(threads);
        }
        if let Some(chunk_size) = self.chunk_size {
            if chunk_size == 0 {
                return Err(StatsError::ConfigInvalid {
                    section: "run".into(),
                    key: "chunk_size".into(),
                    reason: "chunk_size must be at least 1".into(),
                });
            }
            settings.schedule.chunk_size = chunk_size;
        }
        if self.serial {
            settings.schedule.mode = ExecutionMode::Serial;
        }
        Ok(())
    }
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze {
            dir,
            suffix,
            input,
            schedule,
        } => finish(
            resolve_settings(&input, Some(&schedule)).and_then(|mut settings| {
                if let Some(suffix) = suffix {
                    settings.suffix = suffix;
                }
                let catalog = DirCatalog::new(dir, settings.suffix.clone());
                run_catalog(&catalog, &settings)
            }),
            TextReporter::default(),
        ),
        Command::Files {
            files,
            input,
            schedule,
        } => finish(
            resolve_settings(&input, Some(&schedule))
                .and_then(|settings| run_catalog(&FileList::new(files), &settings)),
            TextReporter::default(),
        ),
        Command::Rows {
            file,
            workers,
            input,
        } => finish(
            resolve_settings(&input, None)
                .and_then(|settings| run_rows(&file, workers, &settings)),
            TextReporter::new("Market Summary by Decade (row-parallel)"),
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Logs go to stderr so the report on stdout stays clean.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn load_settings(config_path: Option<&Path>) -> Result<AnalysisSettings, StatsError> {
    match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(path)?;
            AnalysisSettings::from_config(&adapter)
        }
        None => Ok(AnalysisSettings::default()),
    }
}

/// Config file first, then command-line overrides.
pub fn resolve_settings(
    input: &InputArgs,
    schedule: Option<&ScheduleArgs>,
) -> Result<AnalysisSettings, StatsError> {
    let mut settings = load_settings(input.config.as_deref())?;
    input.apply(&mut settings);
    if let Some(schedule) = schedule {
        schedule.apply(&mut settings)?;
    }
    Ok(settings)
}

pub fn run_catalog(
    catalog: &dyn CatalogPort,
    settings: &AnalysisSettings,
) -> Result<RunReport, StatsError> {
    let files = catalog.list_files()?;
    if files.is_empty() {
        return Err(StatsError::NoInput {
            location: catalog.location(),
        });
    }
    info!(location = %catalog.location(), files = files.len(), "input files found");

    let loader = CsvLoader::new(settings.shape).with_max_rows(settings.max_rows);
    Aggregator::new(&loader, settings.rules).run_files(&files, &settings.schedule)
}

pub fn run_rows(
    path: &Path,
    workers: Option<usize>,
    settings: &AnalysisSettings,
) -> Result<RunReport, StatsError> {
    let workers = workers.unwrap_or(settings.row_workers);
    if workers == 0 {
        return Err(StatsError::ConfigInvalid {
            section: "run".into(),
            key: "workers".into(),
            reason: "workers must be at least 1".into(),
        });
    }
    let loader = CsvLoader::new(settings.shape).with_max_rows(settings.max_rows);
    Aggregator::new(&loader, settings.rules).run_rows(path, workers)
}

fn finish(result: Result<RunReport, StatsError>, reporter: TextReporter) -> ExitCode {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match reporter.write(&report, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let settings = match load_settings(Some(config_path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nInput:");
    eprintln!("  suffix:   {}", settings.suffix);
    eprintln!("  columns:  {}", settings.shape.columns());
    match settings.max_rows {
        Some(n) => eprintln!("  max_rows: {n}"),
        None => eprintln!("  max_rows: unlimited"),
    }
    eprintln!("\nRun:");
    eprintln!("  mode:       {:?}", settings.schedule.mode);
    match settings.schedule.threads {
        Some(n) => eprintln!("  threads:    {n}"),
        None => eprintln!("  threads:    one per CPU"),
    }
    eprintln!("  chunk_size: {}", settings.schedule.chunk_size);
    eprintln!("  workers:    {}", settings.row_workers);
    eprintln!("\nFilters:");
    eprintln!(
        "  price:      [{}, {}]",
        settings.rules.min_price, settings.rules.max_price
    );
    eprintln!("  max |r|:    {}", settings.rules.max_abs_return);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
