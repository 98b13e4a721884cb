//! Benchmark run configuration.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_ITERATIONS: u32 = 1000;
pub const DEFAULT_SEED: u64 = 696969;
pub const DEFAULT_FILES_DIR: &str = "files";
pub const DEFAULT_REPORT_PATH: &str = "report/report.xlsx";

/// Settings for one benchmark run.
///
/// ```rust
/// use codec_bench::BenchConfig;
///
/// let config = BenchConfig::default()
///     .with_iterations(10)
///     .with_seed(1)
///     .with_report_path(None::<&str>);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Number of trials; each trial generates a fresh record.
    pub iterations: u32,
    /// Seed for the record generator.
    pub seed: u64,
    /// Directory the encoded bytes are written to and read back from.
    pub files_dir: PathBuf,
    /// Avro schema on disk. `None` uses the embedded schema.
    pub schema_path: Option<PathBuf>,
    /// Spreadsheet report destination. `None` skips the spreadsheet.
    pub report_path: Option<PathBuf>,
    /// CSV report destination. `None` skips the CSV.
    pub csv_path: Option<PathBuf>,
    /// Compare every decoded message with its source record.
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
            schema_path: None,
            report_path: Some(PathBuf::from(DEFAULT_REPORT_PATH)),
            csv_path: None,
            verify: false,
        }
    }
}

impl BenchConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = dir.into();
        self
    }

    pub fn with_schema_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.schema_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn with_report_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.report_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn with_csv_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.csv_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Rejects settings the harness cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.files_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "files directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
