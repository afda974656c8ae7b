//! bikeshare - Explore bicycle-share trip data from city CSV files

use anyhow::Context;
use bikeshare::{
    cli::Cli,
    data_loader::DataLoader,
    pipeline::Pipeline,
    session::{Session, SessionOptions},
};
use bikeshare_core::City;
use bikeshare_terminal::{OutputFormatter, Prompter, get_formatter};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(cli: &Cli) {
    // The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_log_directive()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_batch(
    cli: &Cli,
    pipeline: &Pipeline,
    city: City,
    formatter: &dyn OutputFormatter,
) -> anyhow::Result<()> {
    let filter = cli.filter_spec();
    info!("Running statistics for {} ({})", city, filter);

    let report = pipeline
        .run_once(city, filter)
        .with_context(|| format!("Failed to compute statistics for {city}"))?;
    if !cli.json {
        println!(
            "Loaded {} records, {} match the filter\n",
            report.loaded_rows,
            report.filtered_rows()
        );
    }
    println!("{}", formatter.format_statistics(&report.statistics()));
    Ok(())
}

fn run_interactive(
    cli: &Cli,
    pipeline: &Pipeline,
    formatter: &dyn OutputFormatter,
) -> anyhow::Result<()> {
    println!("Hello! Let's explore some US bikeshare data!");
    let available = pipeline.loader().available_cities();
    if available.is_empty() {
        println!(
            "No city files found in '{}' yet; choose a city anyway to see the expected path.",
            pipeline.loader().data_dir().display()
        );
    }

    let options = SessionOptions {
        month: cli.month,
        weekday: cli.day,
        page_size: cli.page_size,
        preview: !cli.no_preview,
    };
    Session::new(pipeline, formatter, Prompter::stdio(), options)
        .run()
        .context("Interactive session aborted")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let show_progress = !cli.json && is_terminal::is_terminal(std::io::stdout());
    let loader = DataLoader::new(&cli.data_dir).with_progress(show_progress);
    info!("Using data directory {}", loader.data_dir().display());

    let pipeline = Pipeline::new(loader);
    let formatter = get_formatter(cli.json, cli.timings);

    match cli.city {
        Some(city) => run_batch(&cli, &pipeline, city, formatter.as_ref()),
        None => run_interactive(&cli, &pipeline, formatter.as_ref()),
    }
}
