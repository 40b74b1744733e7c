use crate::config::ConfigError;
use crate::http::HttpError;
use thiserror::Error;

/// Errors that stop the process before any case runs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not create http client: {0}")]
    Client(#[from] HttpError),
}
