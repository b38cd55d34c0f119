use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{info, LevelFilter};

use txc_report::api::CoinGeckoClient;
use txc_report::cli::{Cli, Command};
use txc_report::config::Config;
use txc_report::derived::{calculate_otc_profit, calculate_reality_gap};
use txc_report::utils::parse_date;
use txc_report::{logging, metrics, report};

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &cli.log_file {
        Some(path) => logging::init(path, level)
            .with_context(|| format!("Failed to open log file {:?}", path))?,
        None => env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.as_str()),
        )
        .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => Config::default(),
    };
    config.apply_env();
    info!("Configuration loaded; tracking {}", config.api.asset_id);

    metrics::init()?;
    let client = CoinGeckoClient::from_config(&config.api)?;
    let now = Utc::now();

    match cli.command {
        Command::Price { json, section } => {
            let quote = client.fetch_price().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                let profile = section.unwrap_or(config.report.section).profile();
                println!("{}", report::render_quote(&quote, profile, now));
            }
        }
        Command::History { days } => {
            let chart = client.fetch_history(days).await;
            let profile = config.report.section.profile();
            println!("{}", report::render_history(chart.as_ref(), days, profile));
        }
        Command::Countdown { target } => {
            let raw = match target.or_else(|| config.report.strike_date.clone()) {
                Some(raw) => raw,
                None => bail!("No countdown target: pass --target or set report.strike_date"),
            };
            let target = parse_date(&raw)?;
            println!("{}", report::render_countdown(target, now));
        }
        Command::Gap { price } => {
            let (price, source) = match price {
                Some(price) => (price, "input"),
                None => {
                    let quote = client.fetch_price().await;
                    (quote.price, quote.source())
                }
            };
            let target = config.report.strike_target_price;
            let gap = calculate_reality_gap(price, target);
            println!(
                "{}",
                report::render_gap(price, target, gap, source, config.report.section.profile())
            );
        }
        Command::Otc {
            investment,
            cost_basis,
            exit_price,
        } => {
            if investment <= 0.0 || cost_basis <= 0.0 {
                bail!("--investment and --cost-basis must be greater than zero");
            }
            let exit_price = exit_price.unwrap_or(config.report.strike_target_price);
            let projection = calculate_otc_profit(investment, cost_basis, exit_price);
            println!("{}", report::render_otc(&projection));
        }
    }

    if cli.metrics {
        print!("{}", metrics::render()?);
    }

    Ok(())
}
