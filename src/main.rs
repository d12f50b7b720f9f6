use anyhow::{Context, Result};
use api_bench_stats::analysis::{run_analysis, AnalysisContext};
use api_bench_stats::cli::{Cli, REPORT_FILE};
use api_bench_stats::config::AnalysisConfig;
use api_bench_stats::data::load_measurements;
use api_bench_stats::quality::validate;
use api_bench_stats::report::render_report;
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{info, warn};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Block until the operator presses ENTER; skipped when stdin is not a
/// terminal so piped runs never hang.
fn confirm_continue() -> Result<()> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(());
    }

    eprint!("Press ENTER to continue...");
    io::stderr().flush()?;
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    info!("Using measurement logs:");
    info!("  REST: {}", args.rest.display());
    info!("  GraphQL: {}", args.graphql.display());

    let set = load_measurements(&args.rest, &args.graphql)?;
    let mut ctx = AnalysisContext::new(AnalysisConfig::default());

    if !validate(&set, &mut ctx) {
        warn!("Data quality problems detected!");
        warn!("The analysis will continue, but results must be interpreted with caution.");
        confirm_continue()?;
    }

    let results = run_analysis(&set, &mut ctx);

    let report = render_report(&results, &ctx, chrono::Local::now().naive_local());
    std::fs::write(REPORT_FILE, &report)
        .with_context(|| format!("failed to write {}", REPORT_FILE))?;
    info!("Report saved: {}", REPORT_FILE);
    println!("{}", report);

    info!("Analysis complete");
    if ctx.is_clean() {
        info!("No critical problems identified in the data.");
    } else {
        warn!("{} alerts identified. See the report for details.", ctx.alert_count());
    }
    Ok(())
}
