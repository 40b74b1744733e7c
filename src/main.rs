mod assertion;
mod case;
mod config;
mod error;
mod http;
mod json_path;
mod run;
#[cfg(test)]
mod testing;

use crate::case::loader::load_suites;
use crate::config::{Cli, Config};
use crate::error::AppError;
use crate::http::ApiClient;
use crate::run::model::RunReport;
use crate::run::report::{render_report, render_totals};
use crate::run::service::Runner;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run_all(cli).await {
        Ok(reports) => {
            println!("{}", render_totals(&reports));
            if reports.iter().all(|report| report.failed() == 0) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::from(2)
        }
    }
}

async fn run_all(cli: Cli) -> Result<Vec<RunReport>, AppError> {
    let config = Config::try_from(cli)?;
    let suites = load_suites(&config)?;
    let client = Arc::new(ApiClient::new(config.timeout)?);
    info!("running {} suite(s)", suites.len());

    let mut reports = Vec::with_capacity(suites.len());
    for suite in &suites {
        let runner = Runner::new(Arc::clone(&client), suite.base_url.clone());
        let report = runner.run_suite(suite, config.jobs).await;
        println!("{}\n", render_report(&report));
        reports.push(report);
    }
    Ok(reports)
}
