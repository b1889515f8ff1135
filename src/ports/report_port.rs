//! Report rendering port trait.

use crate::domain::engine::RunReport;
use crate::domain::error::StatsError;
use std::io::Write;

/// Port for presenting a finished run.
pub trait ReportPort {
    fn write(&self, report: &RunReport, out: &mut dyn Write) -> Result<(), StatsError>;
}
