//! Plain-text console report.

use std::io::Write;

use crate::domain::cleaner::MAX_YEAR;
use crate::domain::engine::RunReport;
use crate::domain::error::StatsError;
use crate::domain::finalize::DecadeStats;
use crate::ports::report_port::ReportPort;

const RULE: &str = "------------------------------------------------------------";

pub struct TextReporter {
    title: String,
}

impl TextReporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn write_decade(out: &mut dyn Write, stats: &DecadeStats) -> std::io::Result<()> {
        let end = (stats.decade_start + 9).min(MAX_YEAR);
        writeln!(out, "Decade {}–{}:", stats.decade_start, end)?;
        writeln!(out, "  Rows used:             {}", stats.rows_used)?;
        match stats.mean_price {
            Some(p) => writeln!(out, "  Mean market price:     {p:.4}")?,
            None => writeln!(out, "  Mean market price:     N/A")?,
        }
        let vol = stats.volatility();
        writeln!(out, "  Market volatility:     {:.4} ({:.4}%)", vol, vol * 100.0)?;
        match stats.mean_daily_return() {
            Some(r) => writeln!(out, "  Mean daily return:     {:.6} ({:.4}%)", r, r * 100.0)?,
            None => writeln!(out, "  Mean daily return:     N/A")?,
        }
        match stats.annualized_return() {
            Some(r) => writeln!(out, "  Approx annual return:  {:.6} ({:.4}%)", r, r * 100.0)?,
            None => writeln!(out, "  Approx annual return:  N/A")?,
        }
        writeln!(out)
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new("Market Summary by Decade")
    }
}

impl ReportPort for TextReporter {
    fn write(&self, report: &RunReport, out: &mut dyn Write) -> Result<(), StatsError> {
        let summary = &report.summary;

        writeln!(out, "{}", self.title)?;
        writeln!(out, "{RULE}")?;

        if summary.decades.is_empty() {
            writeln!(out, "No usable data.\n")?;
        }
        for stats in summary.decades.values() {
            Self::write_decade(out, stats)?;
        }

        match summary.years.bounds() {
            Some((lo, hi)) => writeln!(out, "Overall Years Range in Data: {lo}–{hi}")?,
            None => writeln!(out, "Overall Years Range in Data: N/A")?,
        }
        writeln!(
            out,
            "Files: {} found, {} used, {} skipped",
            report.files_found,
            summary.files_used,
            report.skipped.len()
        )?;
        writeln!(out, "Workers: {}", report.workers)?;
        writeln!(out, "Execution time: {:.6} seconds", report.elapsed.as_secs_f64())?;
        Ok(())
    }
}
