//! Downloads the configured images into an Xcode asset catalog.
//!
//! Exit status: 0 when every image was written, 2 when some entries were skipped,
//! 1 on an unrecovered error.

use anyhow::Context;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xcasset_fetch::fetcher::{
    Catalog, CryFetcher, FetcherConfig, HttpClient, LogConfig, LogFormat, create_default_runner,
};

const PARTIAL_EXIT: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let config = FetcherConfig::load().context("Failed to load configuration")?;
    let _guard = init_tracing(&config.log);

    info!("Starting image download");

    let runner = create_default_runner(config).context("Failed to set up the fetcher")?;
    let report = runner.run().await.context("Image download aborted")?;
    let config = runner.config();

    if config.cries.enabled {
        let client = HttpClient::from_config(config)?;
        let cries = CryFetcher::new(client, config.cries.clone(), config.delay());
        cries
            .fetch_all(runner.manifest())
            .await
            .context("Cry download aborted")?;
    }

    let catalog = Catalog::at(&report.catalog);
    let status = catalog.inspect(runner.manifest(), &config.image_extension);
    let complete = status.iter().filter(|s| s.is_complete()).count();
    info!(
        "Catalog {}: {}/{} image sets complete",
        report.catalog.display(),
        complete,
        status.len()
    );
    for extra in catalog.unlisted_imagesets(runner.manifest()) {
        warn!("Image set not in manifest: {}", extra.display());
    }

    info!(
        "Download finished: {}/{} downloaded, {} skipped",
        report.downloaded_count(),
        report.total(),
        report.skipped_count()
    );

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(PARTIAL_EXIT))
    }
}

/// Install the stdout subscriber and, if configured, a daily rolling log file
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    let stdout = match log.format {
        LogFormat::Pretty => fmt::layer().with_timer(ChronoLocal::rfc_3339()).boxed(),
        LogFormat::Json => fmt::layer()
            .with_timer(ChronoLocal::rfc_3339())
            .json()
            .boxed(),
    };

    let (file, guard) = match &log.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "xcasset-fetch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(ChronoLocal::rfc_3339())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();

    guard
}
