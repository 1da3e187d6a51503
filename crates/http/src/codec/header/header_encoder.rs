//! HTTP header encoder implementation for serializing response heads
//!
//! Writes `version SP status-code SP description CRLF`, then every header as
//! `name: value CRLF`, then the blank line that separates the head from the body.
//! Header values are written verbatim; keeping `Content-Length` in sync with the body
//! is the caller's job.

use std::fmt::Write;

use bytes::{BufMut, BytesMut};
use http::Version;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{Response, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&Response> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers of `response` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::UnsupportedVersion`] for anything other than HTTP/1.0 and HTTP/1.1,
    /// and [`SendError::InvalidStatusLine`] for a description containing CR or LF.
    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let version = match response.version() {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(SendError::UnsupportedVersion(v));
            }
        };

        if response.description().contains(['\r', '\n']) {
            error!(description = response.description(), "line break in status description");
            return Err(SendError::invalid_status_line("line break in status description"));
        }

        dst.reserve(INIT_HEADER_SIZE);
        write!(dst, "{version} {} {}\r\n", response.status().as_str(), response.description())
            .map_err(|e| SendError::io(std::io::Error::other(e)))?;

        for (header_name, header_value) in response.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
