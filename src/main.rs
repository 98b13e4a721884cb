use clap::Parser;
use codec_bench::config::{DEFAULT_FILES_DIR, DEFAULT_ITERATIONS, DEFAULT_REPORT_PATH, DEFAULT_SEED};
use codec_bench::{BenchConfig, BenchReport, Harness, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Compare serialization formats by encoded size and speed")]
struct Cli {
    /// Number of trials, each with a freshly generated record.
    #[arg(long, short = 'n', default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Seed for the record generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Scratch directory for the encoded files.
    #[arg(long, default_value = DEFAULT_FILES_DIR)]
    files_dir: PathBuf,

    /// Avro schema to load instead of the embedded one.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Spreadsheet report destination.
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Skip the spreadsheet report.
    #[arg(long, default_value_t = false)]
    no_report: bool,

    /// Also write the results as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Check every decoded record against the one that was encoded.
    #[arg(long, default_value_t = false)]
    verify: bool,
}

impl Cli {
    fn into_config(self) -> BenchConfig {
        let report = (!self.no_report).then_some(self.report);
        BenchConfig::default()
            .with_iterations(self.iterations)
            .with_seed(self.seed)
            .with_files_dir(self.files_dir)
            .with_schema_path(self.schema)
            .with_report_path(report)
            .with_csv_path(self.csv)
            .with_verify(self.verify)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.into_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "benchmark failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: BenchConfig) -> Result<()> {
    let harness = Harness::new(config)?;
    let report = harness.run()?;

    report.write_table(std::io::stdout().lock())?;

    if let Some(path) = &harness.config().report_path {
        write_spreadsheet(&report, path)?;
    }
    if let Some(path) = &harness.config().csv_path {
        report.write_csv(path)?;
        info!(path = %path.display(), "wrote CSV report");
    }
    Ok(())
}

#[cfg(feature = "xlsx")]
fn write_spreadsheet(report: &BenchReport, path: &Path) -> Result<()> {
    report.write_xlsx(path)?;
    info!(path = %path.display(), "wrote spreadsheet report");
    Ok(())
}

#[cfg(not(feature = "xlsx"))]
fn write_spreadsheet(_report: &BenchReport, path: &Path) -> Result<()> {
    tracing::warn!(
        path = %path.display(),
        "built without the xlsx feature, skipping spreadsheet report"
    );
    Ok(())
}
