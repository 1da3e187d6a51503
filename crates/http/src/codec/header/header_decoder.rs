//! HTTP header decoder implementation for parsing request heads
//!
//! This module turns the raw bytes of a request line plus header block into a
//! [`RequestHeader`]. The structural work (finding the terminating blank line, splitting
//! the request line into method, target and version, splitting each header line at its
//! colon) is delegated to `httparse`; anything it rejects becomes a [`ParseError`].
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1 request lines are accepted
//!
//! Repeated header names keep the value of their last occurrence.

use bytes::{Buf, BytesMut};
use http::{HeaderName, HeaderValue, Version};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, RequestHeader};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for HTTP request heads implementing the [`Decoder`] trait.
///
/// On success the head is split off the front of the buffer, leaving any body bytes in
/// place, and the declared body length is returned alongside the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (RequestHeader, u64);
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, content_length)))` if a complete head was parsed
    /// - `Ok(None)` if the blank line ending the head has not arrived yet
    /// - `Err(ParseError)` if the head is malformed or over the limits
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let parsed = req.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e),
        })?;

        let body_offset = match parsed {
            Status::Complete(body_offset) => body_offset,
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                trace!(buffered = src.len(), "request head incomplete");
                return Ok(None);
            }
        };

        ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));
        check_header_separators(&src[..body_offset])?;
        trace!(head_size = body_offset, header_count = req.headers.len(), "parsed request head");

        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            v => return Err(ParseError::InvalidVersion(v)),
        };
        let method = http::Method::from_bytes(req.method.ok_or(ParseError::InvalidMethod)?.as_bytes())
            .map_err(|_e| ParseError::InvalidMethod)?;
        let uri = req.path.ok_or(ParseError::InvalidUri)?.parse::<http::Uri>().map_err(|_e| ParseError::InvalidUri)?;

        let mut builder = http::Request::builder().method(method).uri(uri).version(version);
        let header_map = builder.headers_mut().ok_or(ParseError::InvalidUri)?;
        header_map.reserve(req.headers.len());
        for header in req.headers.iter() {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
            let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
            // insert rather than append: the last duplicate wins
            header_map.insert(name, value);
        }

        let header = RequestHeader::from(builder.body(()).map_err(ParseError::invalid_header)?);
        let content_length = header.content_length();

        src.advance(body_offset);
        Ok(Some((header, content_length)))
    }
}

/// Requires every header line of `head` to separate name and value with `": "`.
///
/// httparse also takes `Name:value`; such a line is rejected here instead of being served.
fn check_header_separators(head: &[u8]) -> Result<(), ParseError> {
    let header_lines = head
        .split(|&b| b == b'\n')
        .skip(1)
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .take_while(|line| !line.is_empty());

    for line in header_lines {
        if !line.windows(2).any(|pair| pair == b": ") {
            return Err(ParseError::invalid_header(format!(
                "header line without ': ' separator: {}",
                String::from_utf8_lossy(line)
            )));
        }
    }
    Ok(())
}
