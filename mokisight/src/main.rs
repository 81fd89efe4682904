//! MokiSight - CRM dashboard for small stores.
//!
//! Shows weekly sales, customer segments and the churn-rate gauge of a
//! store, served by the CRM REST backend or by the built-in demo data.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use iced::application;

use mokisight::demo::{DEFAULT_SEED, DemoBackend};
use mokisight::gauge::GaugeScene;
use mokisight::{Flags, MokiSight};
use mokisight_common::{AppConfig, CrmApi, HttpClient, TokenStore, default_config_path, load_config};

/// CRM dashboard for small stores.
#[derive(Parser, Debug)]
#[command(name = "mokisight", version, about)]
struct Args {
    /// Path to configuration file (JSON5)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the built-in demo backend instead of the REST API
    #[arg(long)]
    demo: bool,

    /// Override the log level (e.g. "debug", "mokisight=trace")
    #[arg(long)]
    log_level: Option<String>,

    /// Print the churn gauge for a percentage as SVG and exit
    #[arg(long, value_name = "PERCENT")]
    render_gauge: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(percent) = args.render_gauge {
        println!("{}", GaugeScene::new(percent).to_svg());
        return Ok(());
    }

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config: AppConfig = match &config_path {
        Some(path) if path.exists() => load_config(path)?,
        Some(path) if args.config.is_some() => {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        _ => AppConfig::default(),
    };
    config.validate()?;

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.demo |= args.demo;

    mokisight_common::init_tracing(&config.logging)?;

    tracing::info!("Starting MokiSight");

    let api: Arc<dyn CrmApi> = if config.demo {
        let base_date = config
            .ui
            .base_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        tracing::info!(seed = DEFAULT_SEED, "Using demo backend");
        Arc::new(DemoBackend::new(DEFAULT_SEED, base_date))
    } else {
        let client = HttpClient::new(&config.api)?;
        tracing::info!(base_url = client.base_url(), "Using REST backend");
        Arc::new(client)
    };

    // Demo sessions are not worth remembering.
    let tokens = if config.demo {
        None
    } else {
        TokenStore::in_config_dir()
            .inspect(|store| tracing::debug!(path = %store.path().display(), "Auth token store"))
            .inspect_err(|e| tracing::warn!(error = %e, "Auth token will not be persisted"))
            .ok()
    };

    let flags = Flags {
        config,
        config_path,
        api,
        tokens,
    };

    // Run the Iced application
    application(
        move || MokiSight::new(flags.clone()),
        MokiSight::update,
        MokiSight::view,
    )
    .title(MokiSight::title)
    .subscription(MokiSight::subscription)
    .theme(MokiSight::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
