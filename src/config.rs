// src/config.rs
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_RETRY_DELAY,
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY, DEFAULT_REQUESTS_PER_SECOND,
};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::formatting::StylesheetMode;
use crate::types::{AppCredentials, DocumentId};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

const APP_ID_VAR: &str = "FEISHU_APP_ID";
const APP_SECRET_VAR: &str = "FEISHU_APP_SECRET";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Document URLs or ids (e.g. "https://xxx.feishu.cn/docx/doxcn...")
    #[arg(required = true)]
    pub documents: Vec<String>,

    /// Directory that receives the HTML, images/ and files/
    #[arg(short, long, default_value = "output")]
    pub output_dir: String,

    /// Where the CSS goes: 'inline' (<style> in the page) or 'external' (sibling .css file)
    #[arg(long, default_value_t = StylesheetMode::Inline)]
    pub stylesheet: StylesheetMode,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Maximum API requests per second
    #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_SECOND)]
    pub rps: u32,

    /// Attempts per API call before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles on each retry
    #[arg(long, default_value_t = 1000)]
    pub initial_backoff_ms: u64,

    /// Number of simultaneous asset downloads (default: auto from CPU count)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// API host, e.g. https://open.larksuite.com for Lark tenants
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub base_url: String,

    /// Also write the fetched blocks as pretty JSON next to the HTML
    #[arg(long, default_value_t = false)]
    pub dump_blocks: bool,
}

/// Resolved export configuration, validated and ready to drive the pipeline.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub documents: Vec<DocumentId>,
    pub credentials: AppCredentials,
    pub output_dir: PathBuf,
    pub stylesheet: StylesheetMode,
    pub verbose: bool,
    pub requests_per_second: u32,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub concurrency: Option<usize>,
    pub base_url: String,
    pub dump_blocks: bool,
}

impl ExportConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let credentials = AppCredentials::new(read_env(APP_ID_VAR)?, read_env(APP_SECRET_VAR)?)?;
        Self::from_parts(cli, credentials)
    }

    /// Resolves everything except the credentials, which the caller supplies.
    pub fn from_parts(cli: CommandLineInput, credentials: AppCredentials) -> Result<Self, AppError> {
        let documents = cli
            .documents
            .iter()
            .map(|input| DocumentId::from_input(input))
            .collect::<Result<Vec<_>, _>>()?;

        if cli.rps == 0 {
            return Err(AppError::MissingConfiguration(
                "--rps must be at least 1".to_string(),
            ));
        }
        if cli.concurrency == Some(0) {
            return Err(AppError::MissingConfiguration(
                "--concurrency must be at least 1".to_string(),
            ));
        }

        let config = ExportConfig {
            documents,
            credentials,
            output_dir: PathBuf::from(cli.output_dir),
            stylesheet: cli.stylesheet,
            verbose: cli.verbose,
            requests_per_second: cli.rps,
            max_retries: cli.max_retries,
            initial_backoff: Duration::from_millis(cli.initial_backoff_ms),
            concurrency: cli.concurrency,
            base_url: cli.base_url,
            dump_blocks: cli.dump_blocks,
        };
        config.retry_policy().validate()?;
        Ok(config)
    }

    /// Backoff used around whole-document fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.initial_backoff,
            DEFAULT_MAX_RETRY_DELAY,
            DEFAULT_BACKOFF_FACTOR,
        )
    }
}

fn read_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| {
        AppError::MissingConfiguration(format!("{} environment variable not set", name))
    })
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            credentials: AppCredentials::new("cli_default_app", "default_secret_for_testing")
                .expect("Default credentials should be valid"),
            output_dir: PathBuf::from("output"),
            stylesheet: StylesheetMode::Inline,
            verbose: false,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_RETRY_DELAY,
            concurrency: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            dump_blocks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CommandLineInput {
        CommandLineInput::parse_from(std::iter::once("feishu2html").chain(args.iter().copied()))
    }

    fn credentials() -> AppCredentials {
        AppCredentials::new_unchecked("cli_a", "secret")
    }

    #[test]
    fn test_defaults() {
        let config =
            ExportConfig::from_parts(cli(&["doxcnAbc123"]), credentials()).unwrap();
        assert_eq!(config.documents.len(), 1);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.stylesheet, StylesheetMode::Inline);
        assert_eq!(config.requests_per_second, 3);
        assert_eq!(config.initial_backoff, Duration::from_millis(1000));
        assert!(!config.dump_blocks);
    }

    #[test]
    fn test_flags() {
        let config = ExportConfig::from_parts(
            cli(&[
                "--stylesheet",
                "external",
                "-o",
                "site",
                "--rps",
                "5",
                "--concurrency",
                "2",
                "--dump-blocks",
                "doxcnA",
                "doxcnB",
            ]),
            credentials(),
        )
        .unwrap();
        assert_eq!(config.documents.len(), 2);
        assert_eq!(config.stylesheet, StylesheetMode::External);
        assert_eq!(config.output_dir, PathBuf::from("site"));
        assert_eq!(config.requests_per_second, 5);
        assert_eq!(config.concurrency, Some(2));
        assert!(config.dump_blocks);
    }

    #[test]
    fn test_rejects_zero_rps_and_retries() {
        assert!(ExportConfig::from_parts(cli(&["--rps", "0", "doxcnA"]), credentials()).is_err());
        assert!(
            ExportConfig::from_parts(cli(&["--max-retries", "0", "doxcnA"]), credentials())
                .is_err()
        );
    }

    #[test]
    fn test_default_config_has_valid_retry_policy() {
        assert!(ExportConfig::default().retry_policy().validate().is_ok());
    }
}
