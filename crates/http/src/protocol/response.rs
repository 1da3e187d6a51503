//! HTTP response type handed to handlers.
//!
//! Unlike `http::Response`, the reason phrase is a free-form field so handlers can send
//! any status description they like, and the body is always fully buffered.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode, Version};
use mime::Mime;

/// A mutable HTTP response.
///
/// `Content-Length` is not maintained while the response is being built; call
/// [`Response::update_content_length`] once the body is final.
#[derive(Debug, Clone)]
pub struct Response {
    version: Version,
    status: StatusCode,
    description: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates the response a handler starts from: `HTTP/1.1 200 OK`,
    /// `Content-Type: text/html` and an empty body.
    pub fn new() -> Self {
        let mut response = Self::with_status(StatusCode::OK);
        response.set_content_type(&mime::TEXT_HTML);
        response
    }

    /// Creates a bare response with the canonical reason phrase of `status`, no headers
    /// and an empty body.
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            version: Version::HTTP_11,
            status,
            description: status.canonical_reason().unwrap_or_default().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a complete response for an error status: the canonical reason phrase as a
    /// `text/plain` body, with `Content-Length` already set.
    pub fn error(status: StatusCode) -> Self {
        let mut response = Self::with_status(status);
        response.set_content_type(&mime::TEXT_PLAIN);
        response.set_body(status.canonical_reason().unwrap_or_default());
        response.update_content_length();
        response
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_status(&mut self, status: StatusCode, description: impl Into<String>) {
        self.status = status;
        self.description = description.into();
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn set_content_type(&mut self, content_type: &Mime) {
        if let Ok(value) = HeaderValue::from_str(content_type.as_ref()) {
            self.headers.insert(header::CONTENT_TYPE, value);
        }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Sets `Content-Length` to the byte length of the current body.
    pub fn update_content_length(&mut self) {
        self.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_defaults() {
        let response = Response::new();
        assert_eq!(response.version(), Version::HTTP_11);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.description(), "OK");
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/html");
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());
        assert!(response.body().is_empty());
    }

    #[test]
    fn bare_status_response() {
        let response = Response::with_status(StatusCode::NOT_FOUND);
        assert_eq!(response.description(), "Not Found");
        assert!(response.headers().is_empty());
    }

    #[test]
    fn error_response_is_complete() {
        let response = Response::error(StatusCode::BAD_REQUEST);
        assert_eq!(response.description(), "Bad Request");
        assert_eq!(&response.body()[..], b"Bad Request");
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "11");
    }

    #[test]
    fn content_length_counts_bytes_not_chars() {
        let mut response = Response::new();
        response.set_body("héllo wörld");
        response.update_content_length();
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "13");
    }

    #[test]
    fn content_length_update_is_idempotent() {
        let mut response = Response::new();
        response.set_body(&b"12345"[..]);
        response.update_content_length();
        let first = response.headers().get(header::CONTENT_LENGTH).cloned();
        response.update_content_length();
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).cloned(), first);
        assert_eq!(response.headers().get_all(header::CONTENT_LENGTH).iter().count(), 1);
    }

    #[test]
    fn empty_body_still_gets_content_length() {
        let mut response = Response::with_status(StatusCode::NO_CONTENT);
        response.update_content_length();
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "0");
    }

    #[test]
    fn content_type_from_mime() {
        let mut response = Response::new();
        response.set_content_type(&mime::APPLICATION_JSON);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn custom_description() {
        let mut response = Response::new();
        response.set_status(StatusCode::IM_A_TEAPOT, "Short And Stout");
        assert_eq!(response.status().as_u16(), 418);
        assert_eq!(response.description(), "Short And Stout");
    }
}
