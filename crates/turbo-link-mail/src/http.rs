//! HTTP client seam used by mail providers.

use std::time::Duration;
use thiserror::Error;

/// Body of an outbound POST.
#[derive(Clone, Debug, PartialEq)]
pub enum HttpBody {
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(serde_json::Value),
}

/// An outbound POST request.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: HttpBody,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a completed exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// Connect, TLS, timeout or body read failure
    #[error("request to {url} failed: {reason}")]
    Network {
        /// Target of the failed request
        url: String,
        /// Underlying client error text
        reason: String,
    },
}

/// Issues blocking POST requests.
pub trait HttpClient {
    /// Sends `request` and returns whatever status the server answered with.
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Default blocking client backed by `reqwest`.
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpClient {
    /// Builds a client with a per-request `timeout` that does not follow redirects.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpError::Setup(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let network_error = |e: reqwest::Error| HttpError::Network {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        builder = match &request.body {
            HttpBody::Form(params) => builder.form(params),
            HttpBody::Json(document) => builder.json(document),
        };

        let response = builder.send().map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(network_error)?;

        Ok(HttpResponse { status, body })
    }
}
