use crate::json_path::model::Expression;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonType {
    EqualTo,
    Contains,
    Matches,
    LengthEqualTo,
    Exists,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

/// The part of a response an expectation reads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum Subject {
    Json { path: Expression },
    Body,
    Header { name: String },
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Json { path } => write!(f, "json {}", path),
            Subject::Body => f.write_str("body"),
            Subject::Header { name } => write!(f, "header {}", name),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Expectation {
    pub subject: Subject,
    pub comparison: ComparisonType,
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub negate: bool,
}

impl Expectation {
    pub fn new(subject: Subject, comparison: ComparisonType, expected: Value) -> Self {
        Expectation {
            subject,
            comparison,
            expected,
            negate: false,
        }
    }

    pub fn json(path: &str, comparison: ComparisonType, expected: Value) -> Self {
        Self::new(
            Subject::Json {
                path: Expression::new(path),
            },
            comparison,
            expected,
        )
    }

    pub fn json_eq(path: &str, expected: impl Into<Value>) -> Self {
        Self::json(path, ComparisonType::EqualTo, expected.into())
    }

    pub fn json_len(path: &str, length: u64) -> Self {
        Self::json(path, ComparisonType::LengthEqualTo, Value::from(length))
    }

    pub fn json_exists(path: &str) -> Self {
        Self::json(path, ComparisonType::Exists, Value::Null)
    }

    pub fn body_contains(text: &str) -> Self {
        Self::new(Subject::Body, ComparisonType::Contains, Value::from(text))
    }

    pub fn body_matches(pattern: &str) -> Self {
        Self::new(Subject::Body, ComparisonType::Matches, Value::from(pattern))
    }

    pub fn header_contains(name: &str, text: &str) -> Self {
        Self::new(
            Subject::Header {
                name: name.to_string(),
            },
            ComparisonType::Contains,
            Value::from(text),
        )
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}
