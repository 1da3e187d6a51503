//! Core HTTP protocol types shared by the codec and connection layers.
//!
//! - **Request side** (`request`): [`RequestHeader`] wraps the parsed request line and
//!   header block, [`Request`] adds the assembled body plus the path and query parameters
//!   filled in during dispatch.
//! - **Response side** (`response`): [`Response`] is the mutable object handlers write to.
//! - **Errors** (`error`): [`HttpError`] on top of [`ParseError`] and [`SendError`].
//!
//! Header names are kept in an [`http::HeaderMap`], so lookups are case-insensitive and
//! names are stored (and later serialized) in lowercase.

mod request;
pub use request::Request;
pub use request::RequestHeader;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
