#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub use decastat::domain::record::DailyRecord;

pub const HEADER_7: &str = "Date,Open,High,Low,Close,Adj Close,Volume";
pub const HEADER_6: &str = "Date,Open,High,Low,Close,Volume";

/// One data row: (date, open, high, low, close).
pub type Row<'a> = (&'a str, f64, f64, f64, f64);

/// A temp directory of price files that lives as long as the value.
pub struct PriceDir {
    pub dir: TempDir,
}

impl PriceDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write a 7-column file (adj close mirrors close).
    pub fn with_file(self, name: &str, rows: &[Row]) -> Self {
        let mut content = format!("{HEADER_7}\n");
        for (date, o, h, l, c) in rows {
            content.push_str(&format!("{date},{o},{h},{l},{c},{c},1000\n"));
        }
        self.with_raw(name, &content)
    }

    /// Write a 6-column file.
    pub fn with_plain_file(self, name: &str, rows: &[Row]) -> Self {
        let mut content = format!("{HEADER_6}\n");
        for (date, o, h, l, c) in rows {
            content.push_str(&format!("{date},{o},{h},{l},{c},1000\n"));
        }
        self.with_raw(name, &content)
    }

    pub fn with_raw(self, name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(name), content).unwrap();
        self
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Rows with the same price in all four fields.
pub fn flat_rows(dates: &[&'static str], closes: &[f64]) -> Vec<Row<'static>> {
    dates
        .iter()
        .zip(closes)
        .map(|(d, c)| (*d, *c, *c, *c, *c))
        .collect()
}

/// Deterministic pseudo-random walk for `days` rows starting in `start_year`.
/// About 250 rows per year.
pub fn random_walk(seed: u64, start_year: i32, days: usize) -> Vec<(String, f64, f64, f64, f64)> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut price = 20.0 + (seed % 50) as f64;
    (0..days)
        .map(|i| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let u = (state >> 33) as f64 / (1u64 << 31) as f64;
            price = (price * (1.0 + (u - 0.5) * 0.06)).clamp(0.5, 9_000.0);
            let year = start_year + (i / 250) as i32;
            let day = i % 250;
            (
                format!("{year}-{:02}-{:02}", day / 25 + 1, day % 25 + 1),
                price * 0.99,
                price * 1.02,
                price * 0.98,
                price,
            )
        })
        .collect()
}

pub fn write_walk(dir: &PriceDir, name: &str, rows: &[(String, f64, f64, f64, f64)]) {
    let mut content = format!("{HEADER_7}\n");
    for (date, o, h, l, c) in rows {
        content.push_str(&format!("{date},{o},{h},{l},{c},{c},1000\n"));
    }
    fs::write(dir.file(name), content).unwrap();
}
