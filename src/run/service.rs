use crate::assertion::check::check_expectation;
use crate::assertion::model::Subject;
use crate::case::model::{Suite, TestCase};
use crate::http::{ApiClient, Endpoint, HttpError, HttpRequest, HttpResult};
use crate::run::model::{ExecutionResult, Failure, RunReport};
use futures::{stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Executes test cases against one base URL.
#[derive(Clone)]
pub struct Runner {
    client: Arc<ApiClient>,
    base_url: String,
}

impl Runner {
    pub fn new(client: Arc<ApiClient>, base_url: impl Into<String>) -> Self {
        Runner {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn execute(&self, case: &TestCase) -> ExecutionResult {
        info!("will execute case: {}", case.name);
        let started_at = Instant::now();
        let endpoint = Endpoint::new(case.method, &self.base_url, &case.path, case.headers.clone());
        let url = endpoint.url.clone();
        let result = self
            .client
            .execute(HttpRequest::new(endpoint, case.body.clone()))
            .await;
        let duration = started_at.elapsed();

        let mut execution = ExecutionResult {
            case_name: case.name.clone(),
            method: case.method,
            url,
            observed_status: None,
            body: None,
            failures: vec![],
            duration,
        };
        match result {
            Ok(response) => {
                execution.observed_status = Some(response.status_code);
                execution.failures = evaluate(case, &response);
                execution.body = Some(response.res_body.into_raw());
            }
            Err(error) => execution.failures.push(transport_failure(error)),
        }
        if execution.passed() {
            debug!("case {} passed in {:?}", case.name, duration);
        } else {
            warn!("case {} failed with {} problem(s)", case.name, execution.failures.len());
        }
        execution
    }

    /// Runs every case of the suite with at most `jobs` requests in flight.
    /// Results keep the suite's order whatever the completion order.
    pub async fn run_suite(&self, suite: &Suite, jobs: usize) -> RunReport {
        let id = Uuid::new_v4().to_string();
        info!("run {} of suite {} against {}", id, suite.name, self.base_url);
        let started_at = Instant::now();
        let results = stream::iter(suite.cases.iter())
            .map(|case| self.execute(case))
            .buffered(jobs.max(1))
            .collect::<Vec<ExecutionResult>>()
            .await;
        RunReport {
            id,
            suite: suite.name.clone(),
            base_url: self.base_url.clone(),
            results,
            duration: started_at.elapsed(),
        }
    }
}

/// Status first, then every expectation; a JSON body that does not parse is
/// reported once and the remaining JSON expectations are skipped.
fn evaluate(case: &TestCase, response: &HttpResult) -> Vec<Failure> {
    let mut failures = vec![];
    if response.status_code != case.expected_status {
        failures.push(Failure::Status {
            expected: case.expected_status,
            actual: response.status_code,
        });
    }
    let mut unparsable = false;
    for expectation in &case.expectations {
        if unparsable && matches!(expectation.subject, Subject::Json { .. }) {
            continue;
        }
        if let Err(failure) = check_expectation(expectation, response) {
            unparsable |= matches!(failure, Failure::Parse(_));
            failures.push(failure);
        }
    }
    failures
}

fn transport_failure(error: HttpError) -> Failure {
    if error.is_transport() {
        Failure::Transport(error.to_string())
    } else {
        Failure::InvalidCase(error.to_string())
    }
}
