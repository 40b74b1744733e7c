use crate::http::HttpMethod;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

#[derive(Serialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    Assertion,
    Parse,
    Transport,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Assertion => f.write_str("assertion"),
            FailureKind::Parse => f.write_str("parse"),
            FailureKind::Transport => f.write_str("transport"),
        }
    }
}

#[derive(Error, Serialize, Clone, Debug, Eq, PartialEq)]
pub enum Failure {
    #[error("expected status {expected}, but got {actual}")]
    Status { expected: u16, actual: u16 },
    #[error("{subject}: {message}")]
    Assertion { subject: String, message: String },
    #[error("response body is not valid JSON: {0}")]
    Parse(String),
    #[error("service unreachable: {0}")]
    Transport(String),
    #[error("request could not be built: {0}")]
    InvalidCase(String),
}

impl Failure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Status { .. } | Failure::Assertion { .. } | Failure::InvalidCase(_) => {
                FailureKind::Assertion
            }
            Failure::Parse(_) => FailureKind::Parse,
            Failure::Transport(_) => FailureKind::Transport,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Passed,
    Failed,
}

#[derive(Serialize, Clone, Debug)]
pub struct ExecutionResult {
    pub case_name: String,
    pub method: HttpMethod,
    pub url: String,
    pub observed_status: Option<u16>,
    pub body: Option<String>,
    pub failures: Vec<Failure>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn verdict(&self) -> Verdict {
        if self.failures.is_empty() {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict() == Verdict::Passed
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct RunReport {
    pub id: String,
    pub suite: String,
    pub base_url: String,
    pub results: Vec<ExecutionResult>,
    pub duration: Duration,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}
