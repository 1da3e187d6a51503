//! Connection-level request handlers.
//!
//! A [`Handler`] receives a fully assembled [`Request`] and produces the [`Response`] to
//! write back. It runs synchronously and to completion; connection drivers decide on
//! which thread it runs. An `Err` is answered with `500 Internal Server Error`.
//!
//! Handlers need not set `Content-Length`: the connection layer recomputes it from the
//! final body once `call` has returned.

use std::error::Error;
use std::sync::Arc;

use crate::protocol::{Request, Response};

pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    fn call(&self, request: Request) -> Result<Response, Self::Error>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    type Error = H::Error;

    fn call(&self, request: Request) -> Result<Response, Self::Error> {
        (**self).call(request)
    }
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Err> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Result<Response, Err> + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type Error = Err;

    fn call(&self, request: Request) -> Result<Response, Self::Error> {
        (self.f)(request)
    }
}

pub fn make_handler<F, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Result<Response, Err> + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
