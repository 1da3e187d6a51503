use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;
use nano_http::protocol::{Request, Response};
use tracing::{debug, error};

use crate::handler::RequestHandler;
use crate::query::parse_query;
use crate::router::Router;

/// Routes `request` and runs exactly one handler against a fresh [`Response`].
///
/// A matched route gets the captured path parameters and the decoded query string. The
/// default handler, when no route matches, sees both maps empty. Without a default the
/// answer is a bare `404 Not Found`. `Content-Length` is computed once, after whichever
/// of these ran.
pub(crate) fn invoke(router: &Router, default_handler: Option<&dyn RequestHandler>, mut request: Request) -> Response {
    let route_match = router.at(request.method(), request.path());
    let mut response = match route_match {
        Some(route_match) => {
            let handler = route_match.handler();
            let raw_uri = request.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or_default();
            let query_params = parse_query(raw_uri);

            request.set_path_params(route_match.into_params());
            request.set_query_params(query_params);
            run(handler, &request)
        }

        None => match default_handler {
            Some(handler) => {
                debug!(method = %request.method(), path = request.path(), "using default handler");
                run(handler, &request)
            }
            None => {
                debug!(method = %request.method(), path = request.path(), "no handler, responding not found");
                Response::with_status(StatusCode::NOT_FOUND)
            }
        },
    };

    response.update_content_length();
    response
}

fn run(handler: &dyn RequestHandler, request: &Request) -> Response {
    let mut response = Response::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(request, &mut response)));

    match result {
        Ok(Ok(())) => response,
        Ok(Err(e)) => {
            error!(cause = %e, method = %request.method(), path = request.path(), "request handler failed");
            Response::with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(_panic) => {
            error!(method = %request.method(), path = request.path(), "request handler panicked");
            Response::with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
