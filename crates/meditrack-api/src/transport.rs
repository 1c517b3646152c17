//! Request/response plumbing between the client and the service.
//!
//! [`Transport`] is the only seam through which bytes leave the client.
//! [`HttpTransport`] talks to a real server; [`MockTransport`] replays
//! scripted responses and records every request for tests.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;

use crate::wire::WireResult;

/// Transport-level failures. None of these carry an HTTP status: a response
/// with any status is a successful transport round trip.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Cannot connect to {0}")]
    Connect(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("No scripted response for {method} {path}")]
    Unscripted { method: Method, path: String },
}

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

/// An outgoing request. `path` never contains a query string.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> WireResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        Ok(self)
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

// =========================================================================
// HTTP transport
// =========================================================================

/// Blocking HTTP transport with a cookie jar for the login session.
///
/// No request timeout is set: a hung request blocks its caller until the
/// server answers or the connection drops.
#[cfg(feature = "http")]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(None)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(self.base_url.clone())
            } else {
                TransportError::Client(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        tracing::debug!(method = %request.method, path = %request.path, status, "response received");
        Ok(ApiResponse { status, body })
    }
}

// =========================================================================
// Mock transport
// =========================================================================

#[derive(Debug, Clone)]
enum Scripted {
    Respond(ApiResponse),
    Fail,
}

#[derive(Debug, Default)]
struct Route {
    queue: VecDeque<Scripted>,
    /// The sticky last response has answered at least once
    served: bool,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport for tests.
///
/// Responses queue per `(method, path)`. Each request consumes the front of
/// its queue, except that the last scripted response sticks and answers every
/// later request. Scripting a route whose sticky response has already been
/// served replaces it. Clones share state, so a test can keep one handle and
/// give another to the client under test.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Scripted::Respond(ApiResponse::new(status, body.to_string())));
    }

    /// Queue a response with a raw (possibly non-JSON) body.
    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Scripted::Respond(ApiResponse::new(status, body)));
    }

    /// Queue a transport failure (unreachable server).
    pub fn fail(&self, method: Method, path: &str) {
        self.push(method, path, Scripted::Fail);
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Requests sent to one route, in order.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        let mut state = self.lock();
        let route = state.routes.entry((method, path.to_string())).or_default();
        if route.served {
            route.queue.clear();
            route.served = false;
        }
        route.queue.push_back(scripted);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread cannot leave the state half-written.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let key = (request.method, request.path.clone());
        let scripted = state.routes.get_mut(&key).and_then(|route| {
            if route.queue.len() > 1 {
                route.queue.pop_front()
            } else {
                route.served = true;
                route.queue.front().cloned()
            }
        });

        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail) => Err(TransportError::Connect("mock server".into())),
            None => Err(TransportError::Unscripted {
                method: request.method,
                path: request.path.clone(),
            }),
        }
    }
}
