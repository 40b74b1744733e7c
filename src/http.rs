use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReqParam {
    pub key: String,
    pub value: String,
}

impl ReqParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        ReqParam {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub struct Endpoint {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<ReqParam>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, base: &str, path: &str, headers: Vec<ReqParam>) -> Endpoint {
        Endpoint {
            method,
            url: Self::resolve(base, path),
            headers,
        }
    }

    /// Joins base and path by concatenation so that a base with its own path
    /// prefix (`https://pokeapi.co/api/v2`) keeps it.
    pub fn resolve(base: &str, path: &str) -> String {
        let base = base.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

pub struct HttpRequest {
    pub endpoint: Endpoint,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(endpoint: Endpoint, body: Option<String>) -> HttpRequest {
        HttpRequest { endpoint, body }
    }

    fn has_header(&self, name: &str) -> bool {
        self.endpoint
            .headers
            .iter()
            .any(|header| header.key.eq_ignore_ascii_case(name))
    }
}

/// Response body kept as received; JSON is parsed on first demand and cached.
#[derive(Debug, Default)]
pub struct ResBody {
    raw: String,
    parsed: OnceLock<Result<Value, String>>,
}

impl ResBody {
    pub fn new(raw: String) -> Self {
        Self {
            raw,
            parsed: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn json(&self) -> Result<&Value, String> {
        self.parsed
            .get_or_init(|| serde_json::from_str(&self.raw).map_err(|err| err.to_string()))
            .as_ref()
            .map_err(|err| err.clone())
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}

#[derive(Debug)]
pub struct HttpResult {
    pub status_code: u16,
    pub headers: Vec<ReqParam>,
    pub res_body: ResBody,
}

impl HttpResult {
    pub fn new(status_code: u16, headers: Vec<ReqParam>, res_body: ResBody) -> Self {
        Self {
            status_code,
            headers,
            res_body,
        }
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|header| header.key.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Io(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError {
    /// Whether the error means the remote side could not be reached, as opposed
    /// to a request that could never have been sent.
    pub fn is_transport(&self) -> bool {
        !matches!(self, HttpError::InvalidRequest(_))
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            HttpError::Timeout(error.to_string())
        } else if error.is_connect() {
            HttpError::Connect(error.to_string())
        } else if error.is_builder() {
            HttpError::InvalidRequest(error.to_string())
        } else {
            HttpError::Io(error.to_string())
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    POST,
    GET,
    PUT,
    PATCH,
    DELETE,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::POST => "POST",
            HttpMethod::GET => "GET",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(HttpMethod::POST),
            "GET" => Ok(HttpMethod::GET),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            _ => Err(format!("Invalid HTTP method: {}", s)),
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::POST => Method::POST,
            HttpMethod::GET => Method::GET,
            HttpMethod::PUT => Method::PUT,
            HttpMethod::PATCH => Method::PATCH,
            HttpMethod::DELETE => Method::DELETE,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResult, HttpError> {
        let req = self.build_reqwest(request)?;
        let response = req.send().await.inspect_err(|error| {
            info!("http request failed: {}", error);
        })?;
        let status_code = response.status();
        info!("http request executed, status_code: {}", status_code);
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                ReqParam::new(name.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })
            .collect();
        let text = response.text().await?;
        debug!("response body: {}", text);
        Ok(HttpResult::new(
            status_code.as_u16(),
            headers,
            ResBody::new(text),
        ))
    }

    fn build_reqwest(&self, request: HttpRequest) -> Result<RequestBuilder, HttpError> {
        let needs_content_type =
            request.body.is_some() && !request.has_header(CONTENT_TYPE.as_str());
        let endpoint = request.endpoint;
        info!("{} {}", endpoint.method, endpoint.url);
        let url = Url::parse(&endpoint.url)
            .map_err(|err| HttpError::InvalidRequest(format!("{}: {}", endpoint.url, err)))?;

        let mut headers = HeaderMap::new();
        for header in &endpoint.headers {
            let invalid = |err: &dyn std::fmt::Display| {
                HttpError::InvalidRequest(format!("header {}: {}", header.key, err))
            };
            let name = HeaderName::from_bytes(header.key.as_bytes()).map_err(|err| invalid(&err))?;
            let value = HeaderValue::from_str(&header.value).map_err(|err| invalid(&err))?;
            headers.append(name, value);
        }
        if needs_content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        let mut req = self
            .client
            .request(endpoint.method.into(), url)
            .headers(headers);

        if let Some(body) = request.body {
            debug!("request body: {}", body);
            req = req.body(body);
        }
        Ok(req)
    }
}
