//! Configuration validation.
//!
//! Checks every optional key before a run starts. Missing keys fall back to
//! defaults and always pass.

use crate::domain::error::StatsError;
use crate::domain::settings::ExecutionMode;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), StatsError> {
    validate_input(config)?;
    validate_run(config)?;
    validate_filters(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> StatsError {
    StatsError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Integer value of `key`, or an error when it is present but not an integer.
fn int_value(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, StatsError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(section, key, "expected an integer")),
    }
}

fn float_value(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, StatsError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(section, key, "expected a number")),
    }
}

fn validate_input(config: &dyn ConfigPort) -> Result<(), StatsError> {
    if let Some(suffix) = config.get_string("input", "suffix") {
        if suffix.trim().is_empty() {
            return Err(invalid("input", "suffix", "suffix must not be empty"));
        }
    }
    if let Some(columns) = int_value(config, "input", "columns")? {
        if columns != 6 && columns != 7 {
            return Err(invalid("input", "columns", "columns must be 6 or 7"));
        }
    }
    if let Some(max_rows) = int_value(config, "input", "max_rows")? {
        if max_rows < 0 {
            return Err(invalid("input", "max_rows", "max_rows must be non-negative"));
        }
    }
    Ok(())
}

fn validate_run(config: &dyn ConfigPort) -> Result<(), StatsError> {
    if let Some(threads) = int_value(config, "run", "threads")? {
        if threads < 0 {
            return Err(invalid("run", "threads", "threads must be non-negative"));
        }
    }
    if let Some(chunk) = int_value(config, "run", "chunk_size")? {
        if chunk < 1 {
            return Err(invalid("run", "chunk_size", "chunk_size must be at least 1"));
        }
    }
    if let Some(workers) = int_value(config, "run", "workers")? {
        if workers < 1 {
            return Err(invalid("run", "workers", "workers must be at least 1"));
        }
    }
    if let Some(mode) = config.get_string("run", "mode") {
        if ExecutionMode::parse(&mode).is_none() {
            return Err(invalid("run", "mode", "mode must be serial or parallel"));
        }
    }
    Ok(())
}

fn validate_filters(config: &dyn ConfigPort) -> Result<(), StatsError> {
    let min_price = float_value(config, "filters", "min_price")?.unwrap_or(0.01);
    let max_price = float_value(config, "filters", "max_price")?.unwrap_or(10_000.0);
    let max_abs_return = float_value(config, "filters", "max_abs_return")?.unwrap_or(1.0);

    if min_price <= 0.0 {
        return Err(invalid("filters", "min_price", "min_price must be positive"));
    }
    if max_price <= min_price {
        return Err(invalid(
            "filters",
            "max_price",
            "max_price must be greater than min_price",
        ));
    }
    if max_abs_return <= 0.0 {
        return Err(invalid(
            "filters",
            "max_abs_return",
            "max_abs_return must be positive",
        ));
    }
    Ok(())
}
