//! Generate a synthetic dirty café sales export.
//!
//! The file has the same columns and kinds of defects as the real export
//! and is used by the CSV benchmarks and for trying out `dq-report`.

use clap::Parser;
use dq_guard::test_fixtures::CafeFixture;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "generate-fixtures", about = "Write a synthetic café sales CSV")]
struct Args {
    /// Number of transactions to generate
    #[arg(long, default_value_t = 10_000)]
    rows: usize,

    /// Probability that a field is corrupted
    #[arg(long, default_value_t = 0.1)]
    dirty_ratio: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file
    #[arg(long, default_value = "fixtures/dirty_cafe_sales.csv")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(dir) = args.out.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let fixture = CafeFixture::new(args.rows)
        .with_dirty_ratio(args.dirty_ratio)
        .with_seed(args.seed);
    fixture.write_csv(&args.out)?;

    println!(
        "Wrote {} transactions to {}",
        fixture.rows(),
        args.out.display()
    );
    Ok(())
}
