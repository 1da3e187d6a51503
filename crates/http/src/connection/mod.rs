//! The boundary between the pipeline and whatever owns the sockets.
//!
//! A transport delivers raw chunks per connection and, once, receives the serialized
//! response to write before closing. Two drivers are provided:
//!
//! - [`ConnectionTable`]: event-driven, keeps an explicit map from [`ConnectionId`] to
//!   assembly state and hands finished responses to a [`Transport`]. Suits reactors and
//!   anything else that calls back with "bytes received" / "connection closed".
//! - [`HttpConnection`]: the tokio driver, one task per connection, reading through
//!   `FramedRead` and writing straight to the socket.
//!
//! Both serve exactly one request per connection and close it after the response.
//! Malformed requests are answered with a 400-class response, handler errors and panics
//! with `500 Internal Server Error`.

mod connection_table;
mod http_connection;

pub use connection_table::{ConnectionId, ConnectionTable, Transport};
pub use http_connection::HttpConnection;

use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use http::StatusCode;
use tracing::error;

use crate::codec::ResponseEncoder;
use crate::handler::Handler;
use crate::protocol::{Request, Response};

/// Runs `handler`, turning an `Err` or a panic into a 500 response.
///
/// `Content-Length` of a handler's response is recomputed from its final body here.
pub(crate) fn respond<H: Handler + ?Sized>(handler: &H, request: Request) -> Response {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.call(request))) {
        Ok(Ok(mut response)) => {
            response.update_content_length();
            response
        }
        Ok(Err(e)) => {
            let e: Box<dyn Error + Send + Sync> = e.into();
            error!(cause = %e, "handle request error");
            Response::error(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(_panic) => {
            error!("request handler panicked");
            Response::error(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serializes `response`, falling back to a 500 if it can't be encoded.
pub(crate) fn serialize(response: &Response) -> Bytes {
    let mut encoder = ResponseEncoder::new();
    encoder.encode_to_bytes(response).unwrap_or_else(|e| {
        error!(cause = %e, "can't encode response");
        encoder.encode_to_bytes(&Response::error(StatusCode::INTERNAL_SERVER_ERROR)).unwrap_or_default()
    })
}
