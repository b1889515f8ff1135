//! Run settings assembled from defaults and the optional INI config.

use super::cleaner::CleaningRules;
use super::config_validation::validate_analysis_config;
use super::error::StatsError;
use super::record::RowShape;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One worker, files in catalog order.
    Serial,
    /// Thread pool, one task per chunk of files.
    #[default]
    Parallel,
}

impl ExecutionMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "serial" => Some(ExecutionMode::Serial),
            "parallel" => Some(ExecutionMode::Parallel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub mode: ExecutionMode,
    /// `None` means one thread per CPU.
    pub threads: Option<usize>,
    /// Files handed to a task at a time.
    pub chunk_size: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            threads: None,
            chunk_size: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub suffix: String,
    pub shape: RowShape,
    /// Cap on accepted rows per file.
    pub max_rows: Option<usize>,
    pub rules: CleaningRules,
    pub schedule: Schedule,
    /// Worker count for the row-parallel mode.
    pub row_workers: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            suffix: ".csv".to_string(),
            shape: RowShape::default(),
            max_rows: None,
            rules: CleaningRules::default(),
            schedule: Schedule::default(),
            row_workers: 4,
        }
    }
}

impl AnalysisSettings {
    /// Validate `config` and overlay it on the defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StatsError> {
        validate_analysis_config(config)?;

        let d = Self::default();
        let shape = RowShape::from_columns(config.get_int("input", "columns", 7))
            .unwrap_or(d.shape);
        let max_rows = match config.get_int("input", "max_rows", 0) {
            n if n > 0 => Some(n as usize),
            _ => None,
        };
        let threads = match config.get_int("run", "threads", 0) {
            n if n > 0 => Some(n as usize),
            _ => None,
        };
        let mode = config
            .get_string("run", "mode")
            .and_then(|m| ExecutionMode::parse(&m))
            .unwrap_or(d.schedule.mode);

        Ok(Self {
            suffix: config
                .get_string("input", "suffix")
                .map(|s| s.trim().to_string())
                .unwrap_or(d.suffix),
            shape,
            max_rows,
            rules: CleaningRules {
                min_price: config.get_double("filters", "min_price", d.rules.min_price),
                max_price: config.get_double("filters", "max_price", d.rules.max_price),
                max_abs_return: config.get_double(
                    "filters",
                    "max_abs_return",
                    d.rules.max_abs_return,
                ),
            },
            schedule: Schedule {
                mode,
                threads,
                chunk_size: config.get_int("run", "chunk_size", 1) as usize,
            },
            row_workers: config.get_int("run", "workers", d.row_workers as i64) as usize,
        })
    }
}
