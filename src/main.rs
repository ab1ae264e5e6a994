use anyhow::{Context, Result};
use borsihind::config::Config;
use borsihind::feed::{drop_elapsed, merge_observations, parse_day_ahead};
use borsihind::logging::{LogContext, get_logger_with_context, init_logging};
use borsihind::output::FsSink;
use borsihind::pipeline::Pipeline;
use borsihind::summary::PriceSummary;
use borsihind::tariff::PlanId;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "borsihind")]
#[command(version = env!("APP_VERSION"), about = "Normalize day-ahead electricity prices")]
#[command(long_version = concat!(env!("APP_VERSION"), " (", env!("BUILD_TARGET"), ")"))]
#[command(
    long_about = "Read downloaded Nord Pool day-ahead documents, price every upcoming interval\n\
    under the configured grid plans and write one JSON file per plan and resolution.\n\
    \nExamples:\n  \
    borsihind --input today.json --input tomorrow.json\n  \
    borsihind --input today.json --plan V2,V4 --output-dir ./prices"
)]
struct Cli {
    /// Day-ahead price documents, later files win on overlapping intervals
    #[arg(short, long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Configuration file (default search: borsihind.yaml, /etc/borsihind/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the plan files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Plans to price, comma separated
    #[arg(short, long, value_delimiter = ',')]
    plan: Vec<PlanId>,

    /// Reference time for dropping elapsed intervals (RFC 3339)
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Seller margin in EUR/kWh for the summary
    #[arg(long)]
    margin: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if !cli.plan.is_empty() {
        config.plans = cli.plan.clone();
    }
    if let Some(margin) = cli.margin {
        config.pricing.margin = margin;
    }

    init_logging(&config.logging)?;
    let now = cli.now.unwrap_or_else(Utc::now);
    let run_id = now.format("%Y%m%dT%H%M%SZ").to_string();
    let logger = get_logger_with_context(
        LogContext::new("main")
            .with_area(&config.pricing.feed_area)
            .with_run_id(&run_id),
    );
    logger.info(&format!("Börsihind {} starting", env!("APP_VERSION")));

    let pipeline = Pipeline::from_config(&config)?;

    let mut batches = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        batches.push(parse_day_ahead(&body, &config.pricing.feed_area)?);
    }
    let observations = drop_elapsed(&merge_observations(batches), now);

    let resolutions = config.output.resolutions();
    let output = pipeline
        .run(observations, &config.plans, &resolutions)
        .await
        .inspect_err(|err| {
            if err.is_core() {
                logger.error(&format!("Pricing aborted, check the tariff tables: {}", err));
            }
        })?;
    if output.is_empty() {
        logger.warn("No upcoming prices, nothing written");
        return Ok(());
    }

    let sink = FsSink::new(&config.output.directory);
    let written = Pipeline::publish(&output, &sink).await?;
    logger.info(&format!(
        "Wrote {} files to {}",
        written,
        sink.root().display()
    ));

    if let Some(&plan) = config.plans.first()
        && let Some(&resolution) = resolutions.first()
        && let Some(file) = output.get(plan, resolution)
        && let Some(summary) =
            PriceSummary::from_records(&file.records, resolution, now, config.pricing.margin)
    {
        logger.info(&format!(
            "{} ({})\n{}",
            plan.display_name(),
            resolution,
            summary.overview()
        ));
    }

    Ok(())
}
