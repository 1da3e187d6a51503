//! HTTP codec module for assembling requests and serializing responses
//!
//! Both sides plug into `tokio_util::codec`, so a connection can drive them through
//! `FramedRead`, or feed a [`RequestDecoder`] by hand from any other event source.
//!
//! - [`RequestDecoder`]: request assembly from arbitrarily chunked reads
//!   - head parsing via the [`header`] module
//!   - body framing by `Content-Length` only
//! - [`ResponseEncoder`]: status line, headers, blank line, raw body
//!
//! # Example
//!
//! ```
//! use nano_http::codec::{RequestDecoder, ResponseEncoder};
//! use nano_http::protocol::Response;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer).unwrap();
//! assert!(request.is_some());
//!
//! let mut response = Response::new();
//! response.set_body("hi");
//! response.update_content_length();
//! let bytes = ResponseEncoder::new().encode_to_bytes(&response).unwrap();
//! assert!(bytes.ends_with(b"\r\n\r\nhi"));
//! ```

mod header;
mod request_decoder;
mod response_encoder;

pub use header::{HeaderDecoder, HeaderEncoder};
pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
