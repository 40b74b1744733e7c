use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A JSONPath expression. Bare field paths such as `title` or `user.name` are
/// read relative to the document root.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(transparent)]
pub struct Expression {
    pub value: String,
}

impl Expression {
    pub fn new(value: impl Into<String>) -> Self {
        Expression {
            value: value.into(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
