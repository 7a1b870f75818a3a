//! Transport
//!
//! A single blocking HTTP exchange per call. The resolver and the admin client only
//! see the [`Transport`] trait; [`HttpTransport`] is the reqwest-backed implementation
//! that attaches the bearer credential and applies connect/request timeouts.

use crate::error::Error;
use crate::settings::HttpSettings;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::debug;

/// HTTP methods used by the registry API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub json_body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            json_body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// Status and body of a completed exchange.
///
/// `json_body` is only present when `raw_body` parses as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub json_body: Option<Value>,
    pub raw_body: Vec<u8>,
}

impl TransportResponse {
    pub fn from_raw(status: u16, raw_body: Vec<u8>) -> Self {
        let json_body = if raw_body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&raw_body).ok()
        };
        Self {
            status,
            json_body,
            raw_body,
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        let raw_body = body.to_string().into_bytes();
        Self {
            status,
            json_body: Some(body),
            raw_body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, `None` when empty.
    pub fn body_text(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.raw_body).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// "404 Not Found" style description of a status code.
pub fn status_description(status: u16) -> String {
    match reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}

/// The exchange itself failed: no status was received.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One request, one response. Deadlines are the implementation's concern.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}

fn map_http_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        TransportError(format!("Connection error: {}", error))
    } else {
        TransportError(format!("HTTP error: {}", error))
    }
}

/// reqwest-backed transport carrying an optional bearer credential.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    credential: Option<String>,
}

impl HttpTransport {
    pub fn new(http: &HttpSettings, credential: Option<String>) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .user_agent(concat!("registry-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Settings(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, credential })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if let Some(ref credential) = self.credential {
            builder = builder.bearer_auth(credential);
        }
        if let Some(ref body) = request.json_body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %request.url, "Sending request");
        let response = builder.send().map_err(map_http_error)?;
        let status = response.status().as_u16();
        let raw_body = response.bytes().map_err(map_http_error)?.to_vec();
        debug!(status, bytes = raw_body.len(), "Received response");

        Ok(TransportResponse::from_raw(status, raw_body))
    }
}

// Scripted transport for unit tests
#[cfg(test)]
pub(crate) struct MockTransport {
    routes: std::sync::Mutex<
        Vec<(Method, String, Result<TransportResponse, TransportError>)>,
    >,
    requests: std::sync::Mutex<Vec<TransportRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Register a JSON response. Registrations for the same route are consumed in order.
    pub fn respond(self, method: Method, url: &str, status: u16, body: Value) -> Self {
        self.push(method, url, Ok(TransportResponse::json(status, body)))
    }

    pub fn respond_raw(self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.push(
            method,
            url,
            Ok(TransportResponse::from_raw(status, body.as_bytes().to_vec())),
        )
    }

    pub fn fail(self, method: Method, url: &str, message: &str) -> Self {
        self.push(method, url, Err(TransportError(message.to_string())))
    }

    fn push(
        self,
        method: Method,
        url: &str,
        outcome: Result<TransportResponse, TransportError>,
    ) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((method, url.to_string(), outcome));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Transport for MockTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        let position = routes
            .iter()
            .position(|(method, url, _)| *method == request.method && *url == request.url);
        match position {
            Some(idx) => routes.remove(idx).2,
            None => Err(TransportError(format!(
                "no mock registered for {} {}",
                request.method, request.url
            ))),
        }
    }
}
