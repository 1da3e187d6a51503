//! HTTP request decoder module
//!
//! [`RequestDecoder`] is the request assembler: it is fed whatever bytes a connection
//! has delivered so far, in chunks of any size, and yields exactly one complete
//! [`Request`] once the head and all `Content-Length` body bytes are present.
//!
//! # Example
//!
//! ```
//! use nano_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"llo");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(&request.body()[..], b"hello");
//! ```

use std::cmp;
use std::mem;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, Request, RequestHeader};

/// Upper bound for the body buffer reserved up front; larger bodies grow on demand.
const MAX_BODY_RESERVE: usize = 64 * 1024;

/// A decoder that assembles one HTTP request from arbitrarily split input.
///
/// # State Machine
///
/// - `Head`: waiting for the blank line that ends the header block
/// - `Body`: head parsed, copying bytes until the declared length is reached
///
/// Emitting a request (or failing) returns the decoder to `Head`.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Head,
    Body {
        header: RequestHeader,
        body: BytesMut,
        remaining: u64,
    },
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a request head has been parsed but its body is still incomplete.
    pub fn is_reading_body(&self) -> bool {
        matches!(self.state, State::Body { .. })
    }

    /// Drops any partially assembled request.
    pub fn reset(&mut self) {
        self.state = State::Head;
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to assemble a request from the bytes in `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the head and the whole body have arrived
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: the head is malformed; the decoder is reset
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let State::Head = self.state {
            let (header, content_length) = match self.header_decoder.decode(src) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => return Ok(None),
                Err(e) => {
                    self.reset();
                    return Err(e);
                }
            };

            if content_length == 0 {
                return Ok(Some(Request::new(header, BytesMut::new().freeze())));
            }

            let reserve = usize::try_from(content_length).map_or(MAX_BODY_RESERVE, |len| cmp::min(len, MAX_BODY_RESERVE));
            self.state = State::Body { header, body: BytesMut::with_capacity(reserve), remaining: content_length };
        }

        let State::Body { body, remaining, .. } = &mut self.state else {
            return Ok(None);
        };

        let available = usize::try_from(*remaining).map_or(src.len(), |remaining| cmp::min(remaining, src.len()));
        body.extend_from_slice(&src.split_to(available));
        *remaining -= available as u64;
        trace!(read = available, remaining = *remaining, "read request body");

        if *remaining > 0 {
            return Ok(None);
        }

        match mem::take(&mut self.state) {
            State::Body { header, body, .. } => Ok(Some(Request::new(header, body.freeze()))),
            State::Head => Ok(None),
        }
    }

    /// The peer closed the stream. A request still being assembled is discarded and no
    /// request is produced.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(buf)? {
            return Ok(Some(request));
        }

        if !buf.is_empty() || self.is_reading_body() {
            debug!(buffered = buf.len(), "connection closed with an incomplete request, discarding it");
            buf.clear();
            self.reset();
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use indoc::indoc;

    const POST_FIVE: &[u8] = b"POST /items HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";

    fn decode_in_chunks(raw: &[u8], chunk_size: usize) -> Request {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::new();
        let mut chunks = raw.chunks(chunk_size).peekable();

        while let Some(chunk) = chunks.next() {
            buffer.extend_from_slice(chunk);
            let decoded = decoder.decode(&mut buffer).unwrap();
            if chunks.peek().is_none() {
                return decoded.expect("request should be complete after the last chunk");
            }
            assert!(decoded.is_none(), "request completed before all bytes arrived");
        }
        unreachable!("input must not be empty")
    }

    #[test]
    fn completes_on_blank_line_without_body() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");

        let request = decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.uri(), "/");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
        assert!(!decoder.is_reading_body());
    }

    #[test]
    fn waits_for_body_split_two_then_three() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from("PUT /notes/1 HTTP/1.1\r\nContent-Length: 5\r\n\r\n");

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert!(decoder.is_reading_body());

        buffer.extend_from_slice(b"ab");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"cde");
        let request = decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"abcde");
        assert!(!decoder.is_reading_body());
    }

    #[test]
    fn chunking_does_not_change_the_result() {
        let whole = decode_in_chunks(POST_FIVE, POST_FIVE.len());

        for chunk_size in [1, 2, 3, 7, 16, 40] {
            let split = decode_in_chunks(POST_FIVE, chunk_size);
            assert_eq!(split.method(), whole.method());
            assert_eq!(split.uri(), whole.uri());
            assert_eq!(split.headers(), whole.headers());
            assert_eq!(split.body(), whole.body());
        }
        assert_eq!(&whole.body()[..], b"hello");
    }

    #[test]
    fn ignores_bytes_past_declared_length() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nokEXTRA");

        let request = decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"ok");
        assert_eq!(&buffer[..], b"EXTRA");
    }

    #[test]
    fn get_with_content_length_reads_body() {
        let raw = indoc! {"
            GET /search HTTP/1.1
            Content-Length: 4

            term"};
        let mut buffer = BytesMut::from(raw.replace('\n', "\r\n").as_str());

        let request = RequestDecoder::new().decode(&mut buffer).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"term");
    }

    #[test]
    fn malformed_head_resets_state() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from("BROKEN\r\n\r\n");

        assert!(decoder.decode(&mut buffer).is_err());
        assert!(!decoder.is_reading_body());
    }

    #[test]
    fn eof_discards_partial_request() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc");

        assert!(decoder.decode_eof(&mut buffer).unwrap().is_none());
        assert!(buffer.is_empty());
        assert!(!decoder.is_reading_body());
    }

    #[test]
    fn eof_still_yields_complete_request() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(POST_FIVE);

        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"hello");
    }
}
