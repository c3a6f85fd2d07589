// src/main.rs

use clap::Parser;
use feishu2html::{
    AppError, CommandLineInput, DocumentExporter, DocumentRepository, ExportConfig,
    FeishuHttpClient, RateLimiter,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("feishu2html.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the client and exporter, then exports every requested document.
async fn run(config: &ExportConfig) -> Result<(), AppError> {
    let limiter = Arc::new(
        RateLimiter::new(config.requests_per_second)?
            .with_backoff(config.max_retries, config.initial_backoff),
    );
    let client: Arc<dyn DocumentRepository> = Arc::new(FeishuHttpClient::new(
        &config.base_url,
        config.credentials.clone(),
        Arc::clone(&limiter),
    )?);

    let exporter = DocumentExporter::new(client, limiter, config);
    let outcomes = exporter.export_batch(&config.documents).await?;

    for outcome in &outcomes {
        if let Some(path) = &outcome.html_path {
            println!("✓ {} → {}", outcome.title, path.display());
        }
        if outcome.assets.failed() > 0 {
            eprintln!(
                "⚠️  {} asset(s) of '{}' could not be downloaded",
                outcome.assets.failed(),
                outcome.title
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ExportConfig::resolve(cli)?;

    run(&config).await?;

    Ok(())
}
