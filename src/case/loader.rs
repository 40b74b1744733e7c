use crate::case::catalog::builtin_suites;
use crate::case::model::Suite;
use crate::config::{validate_base_url, Config, ConfigError};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Built-in suites followed by every suite file, narrowed to `--only` when set.
pub fn load_suites(config: &Config) -> Result<Vec<Suite>, ConfigError> {
    let mut suites = builtin_suites(config);
    for path in &config.suite_files {
        suites.push(load_suite_file(path)?);
    }
    match &config.only {
        None => Ok(suites),
        Some(name) => {
            let selected: Vec<Suite> =
                suites.into_iter().filter(|suite| &suite.name == name).collect();
            if selected.is_empty() {
                Err(ConfigError::UnknownSuite(name.clone()))
            } else {
                Ok(selected)
            }
        }
    }
}

pub fn load_suite_file(path: &Path) -> Result<Suite, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SuiteFileIo {
        path: path.to_path_buf(),
        source,
    })?;
    let suite = parse_suite(&content).map_err(|source| ConfigError::SuiteFileFormat {
        path: path.to_path_buf(),
        source,
    })?;
    let suite = validate_suite(suite)?;
    info!("loaded suite {} with {} cases from {}", suite.name, suite.cases.len(), path.display());
    Ok(suite)
}

pub fn parse_suite(content: &str) -> Result<Suite, serde_json::Error> {
    serde_json::from_str(content)
}

pub fn validate_suite(mut suite: Suite) -> Result<Suite, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSuite {
        suite: suite.name.clone(),
        reason,
    };
    if suite.name.trim().is_empty() {
        return Err(invalid("suite name is empty".to_string()));
    }
    if suite.cases.is_empty() {
        return Err(invalid("suite has no cases".to_string()));
    }
    let mut names = HashSet::new();
    for case in &suite.cases {
        if !names.insert(case.name.as_str()) {
            return Err(invalid(format!("duplicate case name \"{}\"", case.name)));
        }
        if !(100..=599).contains(&case.expected_status) {
            return Err(invalid(format!(
                "case \"{}\" expects status {}, which is not an HTTP status",
                case.name, case.expected_status
            )));
        }
    }
    let base_url =
        validate_base_url(&format!("base_url of suite {}", suite.name), &suite.base_url)?;
    suite.base_url = base_url;
    Ok(suite)
}
