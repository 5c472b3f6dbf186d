use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use std::{io::stderr, path::PathBuf};

use monthly_sales::{Groups, MonthlySales};

#[derive(Parser)]
#[command(version, about)]
/// Reports monthly sales statistics from a transaction log.
struct Args {
    /// Report file to write
    #[arg(short, long, default_value = "monthly_statistics_output.txt")]
    output: PathBuf,
    /// File of item groups, one `NAME | REGEX` per line
    #[arg(short, long)]
    groups: Option<PathBuf>,
    /// Diagnostics level: error, warn, info, debug, or trace
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
    /// Path to the sales log (the first line is a header)
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let groups = match &args.groups {
        Some(path) => Groups::from_file(path)?,
        None => Groups::default(),
    };
    let mut sales = MonthlySales::with_groups(groups);
    sales.read_csv(&args.input)?;
    info!(
        accepted = sales.accepted(),
        rejected = sales.rejected(),
        "file processing complete"
    );

    let summary = sales.summarize();
    println!("{summary}");
    summary.write_to(&args.output)?;
    info!("monthly statistics written to {}", args.output.display());
    Ok(())
}

fn setup_logging(level: LevelFilter) {
    // stdout carries the report
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}
