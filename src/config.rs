use crate::case::catalog::{DEFAULT_BLOG_URL, DEFAULT_POKEMON_URL};
use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(
    name = "restcheck",
    version,
    about = "Runs HTTP contract test suites and reports each case"
)]
pub struct Cli {
    /// Base URL of the blog mock API
    #[arg(long, env = "RESTCHECK_BLOG_URL", default_value = DEFAULT_BLOG_URL)]
    pub blog_url: String,

    /// Base URL of the Pokémon API
    #[arg(long, env = "RESTCHECK_POKEMON_URL", default_value = DEFAULT_POKEMON_URL)]
    pub pokemon_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "RESTCHECK_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Number of cases of a suite allowed in flight at once
    #[arg(long, env = "RESTCHECK_JOBS", default_value_t = 1)]
    pub jobs: usize,

    /// Additional suite definitions in JSON
    #[arg(long)]
    pub suite_file: Vec<PathBuf>,

    /// Run only the suite with this name
    #[arg(long)]
    pub only: Option<String>,

    /// Log requests and responses
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is missing")]
    MissingUrl { name: String },
    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: String, value: String },
    #[error("timeout must be at least one second")]
    ZeroTimeout,
    #[error("jobs must be at least 1")]
    ZeroJobs,
    #[error("could not read suite file {path}: {source}")]
    SuiteFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse suite file {path}: {source}")]
    SuiteFileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid suite {suite}: {reason}")]
    InvalidSuite { suite: String, reason: String },
    #[error("no suite named {0}")]
    UnknownSuite(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub blog_url: String,
    pub pokemon_url: String,
    pub timeout: Duration,
    pub jobs: usize,
    pub suite_files: Vec<PathBuf>,
    pub only: Option<String>,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if cli.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        Ok(Config {
            blog_url: validate_base_url("blog url", &cli.blog_url)?,
            pokemon_url: validate_base_url("pokemon url", &cli.pokemon_url)?,
            timeout: Duration::from_secs(cli.timeout_secs),
            jobs: cli.jobs,
            suite_files: cli.suite_file,
            only: cli.only,
        })
    }
}

pub fn validate_base_url(name: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingUrl {
            name: name.to_string(),
        });
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(trimmed.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidUrl {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
