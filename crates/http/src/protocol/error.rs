use std::io;

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors raised while assembling a request from raw bytes.
///
/// Apart from [`ParseError::Io`], every variant describes a malformed request and
/// is answered with a 400-class response by the connection layer.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid http uri")]
    InvalidUri,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the error came from the underlying stream rather than the bytes on it.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// The status the peer should receive for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TooLargeHeader { .. } => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("unsupported http version: {0:?}")]
    UnsupportedVersion(http::Version),

    #[error("invalid status line: {reason}")]
    InvalidStatusLine { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_status_line<S: ToString>(str: S) -> Self {
        Self::InvalidStatusLine { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_requests_map_to_client_errors() {
        assert_eq!(ParseError::InvalidMethod.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ParseError::invalid_header("no colon").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ParseError::too_many_headers(64).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ParseError::too_large_header(9000, 8192).status_code(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
        assert!(ParseError::io(io::ErrorKind::ConnectionReset).is_io());
        assert!(!ParseError::InvalidUri.is_io());
    }
}
