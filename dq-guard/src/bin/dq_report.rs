//! Validate a CSV export and print a data quality report.
//!
//! ```text
//! dq-report data/dirty_cafe_sales.csv --out results.json --format markdown
//! ```
//!
//! Without `--suite` the café reference suite and its labels are used.

use clap::{Parser, ValueEnum};
use dq_guard::core::{ExpectationSuite, ValidationEngine};
use dq_guard::formatters::{HumanFormatter, JsonFormatter, MarkdownFormatter, ResultFormatter};
use dq_guard::interchange;
use dq_guard::labels::LabelTable;
use dq_guard::logging::setup::{init_logging, LoggingConfig};
use dq_guard::prelude::*;
use dq_guard::profile::QualityKpis;
use dq_guard::reference;
use dq_guard::sources::{CsvOptions, CsvSource};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "dq-report", version, about = "Rule-based data quality report for CSV files")]
struct Args {
    /// CSV file to validate
    csv: PathBuf,

    /// Suite definition (JSON); defaults to the café reference suite.
    /// Expectations may carry a `label` used in the report and result records
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Write result records for the dashboard to this file
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Skip the dataset quality figures
    #[arg(long)]
    no_kpis: bool,

    /// Disable ANSI colors in human output
    #[arg(long)]
    no_color: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(LoggingConfig::default().with_json_format(args.json_logs)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "dq-report failed");
            eprintln!("Error: {e}");
            if e.is_configuration_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let (suite, labels) = match &args.suite {
        Some(path) => {
            let suite = ExpectationSuite::load(path)?;
            let labels = LabelTable::from_suite(&suite);
            (suite, labels)
        }
        None => (reference::transaction_suite()?, reference::transaction_labels()),
    };

    let csv_path = args
        .csv
        .to_str()
        .ok_or_else(|| DqError::Configuration("CSV path contains invalid UTF-8".to_string()))?;
    let options = CsvOptions::default().with_numeric_columns(suite.numeric_columns());
    let source = CsvSource::with_options(csv_path, options)?;
    let dataset = source.load().await?;

    let report = ValidationEngine::new().run(&dataset, &suite)?;

    let config = FormatterConfig::default().with_colors(!args.no_color);
    let formatter: Box<dyn ResultFormatter> = match args.format {
        OutputFormat::Human => Box::new(HumanFormatter::with_config(config).with_labels(labels.clone())),
        OutputFormat::Json => Box::new(JsonFormatter::with_config(config).with_labels(labels.clone())),
        OutputFormat::Markdown => {
            Box::new(MarkdownFormatter::with_config(config).with_labels(labels.clone()))
        }
    };

    print!("{}", formatter.format(&report)?);
    if !args.no_kpis {
        let kpis = QualityKpis::compute(&dataset, &report.summary());
        println!("{}", formatter.format_kpis(&kpis)?);
    }

    if let Some(out) = &args.out {
        let records = interchange::to_records(&report.results, &labels);
        interchange::write_records(out, &records)?;
        info!(path = %out.display(), records = records.len(), "Result records written");
    }

    Ok(())
}
