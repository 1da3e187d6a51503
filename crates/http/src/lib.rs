//! The wire half of an embeddable HTTP/1.x request pipeline
//!
//! This crate turns raw, arbitrarily chunked connection bytes into complete requests and
//! serializes responses back into bytes. Routing lives in `nano-web`; here the request
//! is handed to a single [`handler::Handler`].
//!
//! # Features
//!
//! - Incremental request assembly, tolerant of any chunk boundaries
//! - `Content-Length` body framing
//! - One request per connection, closed after the response
//! - Malformed requests answered with 400-class responses, handler failures with 500
//! - A tokio connection driver and a callback-driven connection table
//!
//! # Example
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use nano_http::connection::HttpConnection;
//! use nano_http::handler::make_handler;
//! use nano_http::protocol::{Request, Response};
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//!
//! fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     info!(path = request.path(), "hello world");
//!     let mut response = Response::new();
//!     response.set_body("Hello World!\r\n");
//!     Ok(response)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             if let Err(e) = HttpConnection::new(reader, writer).process(handler).await {
//!                 error!(cause = %e, "connection finished with error");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, response and error types
//! - [`codec`]: request assembly and response serialization
//! - [`handler`]: the request handler trait
//! - [`connection`]: transport drivers
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only, no TLS, no chunked transfer encoding
//! - No keep-alive or pipelining
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
