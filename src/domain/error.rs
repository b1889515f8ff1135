//! Domain error types.

/// Top-level error type for decastat.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("out of memory while loading {path}")]
    Allocation { path: String },

    #[error("cannot open directory {dir}: {reason}")]
    Catalog { dir: String, reason: String },

    #[error("no input files found in {location}")]
    NoInput { location: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to build worker pool: {reason}")]
    ThreadPool { reason: String },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Whether the run can continue by skipping the file that produced this error.
    pub fn is_skippable(&self) -> bool {
        matches!(self, StatsError::Unreadable { .. } | StatsError::Allocation { .. })
    }
}

impl From<&StatsError> for std::process::ExitCode {
    fn from(err: &StatsError) -> Self {
        let code: u8 = match err {
            StatsError::Io(_)
            | StatsError::Unreadable { .. }
            | StatsError::Allocation { .. }
            | StatsError::Catalog { .. } => 1,
            StatsError::ConfigParse { .. } | StatsError::ConfigInvalid { .. } => 2,
            StatsError::ThreadPool { .. } | StatsError::WorkerPanicked { .. } => 3,
            StatsError::NoInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
