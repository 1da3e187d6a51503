//! HTTP request types.
//!
//! [`RequestHeader`] wraps the standard `http::Request<()>` produced by the header
//! decoder. [`Request`] is what handlers see: the header, the fully assembled body and
//! the parameter maps populated by the router.

use std::collections::HashMap;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version, header};

/// The request line and header block of an HTTP request.
#[derive(Debug)]
pub struct RequestHeader {
    inner: http::Request<()>,
}

impl AsRef<http::Request<()>> for RequestHeader {
    fn as_ref(&self) -> &http::Request<()> {
        &self.inner
    }
}

impl AsMut<http::Request<()>> for RequestHeader {
    fn as_mut(&mut self) -> &mut http::Request<()> {
        &mut self.inner
    }
}

impl RequestHeader {
    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> http::Request<()> {
        self.inner
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Value of the `Content-Type` header, or an empty string when it is absent or not text.
    pub fn content_type(&self) -> &str {
        self.headers().get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()).unwrap_or_default()
    }

    /// Number of body bytes announced by `Content-Length`.
    ///
    /// A missing or non-numeric header counts as zero, so such a request is complete
    /// as soon as its header block is.
    pub fn content_length(&self) -> u64 {
        self.headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }
}

impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: http::Request::from_parts(parts, ()) }
    }
}

impl From<http::Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: http::Request<()>) -> Self {
        Self { inner }
    }
}

/// A complete request: header, body and the parameters extracted during routing.
///
/// `path_params` and `query_params` stay empty until the request has been matched
/// against a route.
#[derive(Debug)]
pub struct Request {
    header: RequestHeader,
    body: Bytes,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
}

impl Request {
    pub fn new(header: RequestHeader, body: Bytes) -> Self {
        Self { header, body, path_params: HashMap::new(), query_params: HashMap::new() }
    }

    pub fn header(&self) -> &RequestHeader {
        &self.header
    }

    pub fn method(&self) -> &Method {
        self.header.method()
    }

    /// The request target as sent, query string included.
    pub fn uri(&self) -> &Uri {
        self.header.uri()
    }

    /// The request target with the query string stripped.
    pub fn path(&self) -> &str {
        self.header.uri().path()
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.header.headers()
    }

    pub fn content_type(&self) -> &str {
        self.header.content_type()
    }

    pub fn content_length(&self) -> u64 {
        self.header.content_length()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = params;
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }

    pub fn set_query_params(&mut self, params: HashMap<String, String>) {
        self.query_params = params;
    }

    pub fn into_parts(self) -> (RequestHeader, Bytes) {
        (self.header, self.body)
    }
}
