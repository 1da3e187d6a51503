//! Routing and dispatch on top of `nano-http`
//!
//! A [`Server`] holds an ordered route table of `(method, template, handler)` entries and an
//! optional default handler. Each assembled request is matched against the table in
//! registration order, its path parameters and query string are decoded, and exactly one
//! handler runs against a response pre-filled with `200 OK` and `Content-Type: text/html`.
//!
//! # Example
//!
//! ```no_run
//! use nano_http::protocol::{Request, Response};
//! use nano_web::{Server, handler_fn};
//!
//! fn user(request: &Request, response: &mut Response) {
//!     let id = request.path_param("id").unwrap_or_default();
//!     response.set_body(format!("user {id}"));
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder().get("/users/:id", handler_fn(user)).build()?;
//!     server.listen(8080).await?.run().await;
//!     Ok(())
//! }
//! ```
//!
//! Route templates are literal segments and `:name` placeholders, each placeholder
//! matching one non-empty segment. When two templates can match the same path, the one
//! registered first wins.

mod invoker;

pub mod handler;
pub mod query;
pub mod router;
pub mod server;

pub use handler::HandlerError;
pub use handler::RequestHandler;
pub use handler::handler_fn;
pub use query::parse_query;
pub use router::Router;
pub use server::Server;
