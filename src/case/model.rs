use crate::assertion::model::Expectation;
use crate::http::{HttpMethod, ReqParam};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// One request and what its response must look like.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
pub struct TestCase {
    #[builder(into)]
    pub name: String,
    pub method: HttpMethod,
    #[builder(into)]
    pub path: String,
    #[serde(default)]
    #[builder(default)]
    pub headers: Vec<ReqParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub body: Option<String>,
    pub expected_status: u16,
    #[serde(default)]
    #[builder(default)]
    pub expectations: Vec<Expectation>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Suite {
    pub name: String,
    pub base_url: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Suite {
            name: name.into(),
            base_url: base_url.into(),
            cases,
        }
    }
}
