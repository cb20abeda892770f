use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use strompris::app::run_check;
use strompris::feed::{HvaKosterStrommenFeed, ProbeOutcome, TlsSettings};
use strompris::logging::{get_logger, init_logging};
use strompris::normalize::ChronoTzLookup;
use strompris::notify::DesktopNotifier;
use strompris::pipeline::target_day_local;
use strompris::{Config, StromprisError};

/// Day-ahead electricity prices from hvakosterstrommen.no, with the cheap hours picked out
#[derive(Debug, Parser)]
#[command(name = "strompris", version = env!("APP_VERSION"))]
struct Cli {
    /// Delivery day to check (defaults to tomorrow)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Configuration file (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Probe every TLS trust option against the feed and exit
    #[arg(long)]
    check_tls: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<StromprisError>()
                .map(StromprisError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;
    init_logging(&config.logging)?;

    let logger = get_logger("main");
    logger.info(&format!("Strompris {} starting", env!("APP_VERSION")));

    let tls = TlsSettings::from_env(&config.tls);
    let feed = HvaKosterStrommenFeed::from_config(&config, tls);

    if cli.check_tls {
        let day = cli.date.unwrap_or_else(|| Local::now().date_naive());
        return check_tls(&feed, &config.area, day).await;
    }

    let day = target_day_local(cli.date);
    let notifier = DesktopNotifier::new();
    run_check(&config, &feed, &ChronoTzLookup, &notifier, day).await?;
    logger.info("Price check complete");
    Ok(())
}

async fn check_tls(feed: &HvaKosterStrommenFeed, area: &str, day: NaiveDate) -> Result<()> {
    println!("TLS trust check against {} prices for {}", area, day);
    let probes = feed.probe_trust_options(area, day).await;
    for probe in &probes {
        println!("  {:<45} {}", probe.option, probe.outcome);
    }

    let working = probes
        .iter()
        .find(|p| matches!(p.outcome, ProbeOutcome::Success { .. } | ProbeOutcome::HttpStatus(_)));
    match working {
        Some(probe) => {
            println!("First working option: {}", probe.option);
            Ok(())
        }
        None => bail!("No trust option could reach the feed"),
    }
}
