use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icon_cache::{
    config::{
        Config,
        defaults::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_LEVEL},
    },
    icons::BackgroundColor,
    models::VersionKey,
    pipeline::{IconPipeline, RunOutcome},
};

#[derive(Parser)]
#[command(name = "icon-cache")]
#[command(about = "Generates and caches app icon and launch-screen variants per release version")]
#[command(long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Release version (x.y.z) or dev
    #[arg(long, value_name = "VERSION")]
    version: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Cache directory (overrides config file)
    #[arg(long, value_name = "DIR")]
    cache_path: Option<PathBuf>,

    /// Working copy directory holding icon.png (overrides config file)
    #[arg(long, value_name = "DIR")]
    app_path: Option<PathBuf>,

    /// Background for filled variants, e.g. #ffffff (overrides config file)
    #[arg(long, value_name = "COLOR")]
    background_color: Option<BackgroundColor>,

    /// Log level
    #[arg(short = 'v', long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("icon_cache={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Nothing is read from disk for a malformed version.
    let version = match VersionKey::parse(cli.version.as_deref().unwrap_or_default()) {
        Ok(version) => version,
        Err(e) => {
            error!("Icon generation failed: {}", e);
            return Err(e.into());
        }
    };

    let mut config = Config::load_from_file(&cli.config)?;

    if let Some(cache_path) = cli.cache_path {
        config.storage.cache_path = cache_path;
    }
    if let Some(app_path) = cli.app_path {
        config.storage.app_path = app_path;
    }
    if let Some(background_color) = cli.background_color {
        config.icons.background_color = background_color;
    }

    info!(
        "Using cache {} with background {}",
        config.storage.cache_path.display(),
        config.icons.background_color
    );

    let pipeline = IconPipeline::from_config(&config);
    let report = match pipeline.run(version.as_str()).await {
        Ok(report) => report,
        Err(e) => {
            error!("Icon generation failed: {}", e);
            return Err(e.into());
        }
    };

    match &report.outcome {
        RunOutcome::VersionCached => info!("Nothing to do for version {}", report.version),
        RunOutcome::PromotedFromHash { content_hash } => {
            info!("Reused icons {} for version {}", content_hash, report.version)
        }
        RunOutcome::Rendered {
            content_hash,
            variants,
        } => info!(
            "Generated {} files as {} for version {}",
            variants, content_hash, report.version
        ),
    }
    info!("Icons available in {}", report.output_dir.display());

    // Completion notice independent of the log filter
    println!("Icon generation done. ({})", report.output_dir.display());

    Ok(())
}
