use std::error::Error;

use nano_http::protocol::{Request, Response};

/// The error a request handler may fail with; it is answered with a 500.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// A route handler.
///
/// Handlers run synchronously against the parsed request (path and query parameters
/// included) and a response pre-filled with `200 OK`, `Content-Type: text/html` and an
/// empty body, which they may change in any way. `Content-Length` is filled in after the
/// handler returns.
pub trait RequestHandler: Send + Sync {
    fn invoke(&self, request: &Request, response: &mut Response) -> Result<(), HandlerError>;
}

impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    fn invoke(&self, request: &Request, response: &mut Response) -> Result<(), HandlerError> {
        (**self).invoke(request, response)
    }
}

/// What a handler function may return: nothing, or a `Result`.
pub trait HandlerOutput {
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E: Into<HandlerError>> HandlerOutput for Result<(), E> {
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(Into::into)
    }
}

/// Wraps a plain function or closure as a [`RequestHandler`].
#[derive(Debug)]
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F, O>(f: F) -> FnHandler<F>
where
    F: Fn(&Request, &mut Response) -> O + Send + Sync,
    O: HandlerOutput,
{
    FnHandler { f }
}

impl<F, O> RequestHandler for FnHandler<F>
where
    F: Fn(&Request, &mut Response) -> O + Send + Sync,
    O: HandlerOutput,
{
    fn invoke(&self, request: &Request, response: &mut Response) -> Result<(), HandlerError> {
        (self.f)(request, response).into_result()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use bytes::Bytes;

    fn assert_is_handler<T: RequestHandler>(_handler: &T) {
        // no op
    }

    fn request() -> Request {
        Request::new(http::Request::builder().uri("/").body(()).unwrap().into(), Bytes::new())
    }

    #[test]
    fn unit_returning_fn_is_handler() {
        fn hello(_request: &Request, response: &mut Response) {
            response.set_body("hello");
        }

        let handler = handler_fn(hello);
        assert_is_handler(&handler);

        let mut response = Response::new();
        handler.invoke(&request(), &mut response).unwrap();
        assert_eq!(&response.body()[..], b"hello");
    }

    #[test]
    fn result_returning_closure_is_handler() {
        let handler = handler_fn(|_request: &Request, _response: &mut Response| Err::<(), _>(io::Error::other("nope")));
        assert_is_handler(&handler);

        let err = handler.invoke(&request(), &mut Response::new()).unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn boxed_handler_delegates() {
        let handler: Box<dyn RequestHandler> = Box::new(handler_fn(|_request: &Request, response: &mut Response| {
            response.set_body("boxed");
        }));

        let mut response = Response::new();
        handler.invoke(&request(), &mut response).unwrap();
        assert_eq!(&response.body()[..], b"boxed");
    }
}
