//! Request head decoding and response head encoding
//!
//! - [`HeaderDecoder`]: parses a request line plus header block, enforcing the size and
//!   count limits, and reports the declared body length
//! - [`HeaderEncoder`]: writes a response status line plus header block, in the header
//!   map's iteration order, followed by the blank separator line

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
