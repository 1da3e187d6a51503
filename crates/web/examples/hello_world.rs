use nano_http::protocol::{Request, Response};
use nano_web::{HandlerError, Server, handler_fn};
use tracing::{Level, error};

fn hello_world(_request: &Request, response: &mut Response) {
    response.set_body("hello world");
}

fn user(request: &Request, response: &mut Response) -> Result<(), HandlerError> {
    let id: u64 = request.path_param("id").unwrap_or_default().parse()?;
    let greeting = request.query_param("greeting").unwrap_or("hello");

    response.set_content_type(&mime::TEXT_PLAIN_UTF_8);
    response.set_body(format!("{greeting}, user {id}"));
    Ok(())
}

fn echo(request: &Request, response: &mut Response) {
    response.set_content_type(&mime::APPLICATION_OCTET_STREAM);
    response.set_body(request.body().clone());
}

fn default_handler(request: &Request, response: &mut Response) {
    response.set_status(http::StatusCode::NOT_FOUND, "Not Found");
    response.set_body(format!("404 not found: {}", request.path()));
}

#[tokio::main]
async fn main() {
    let server = match Server::builder()
        .get("/", handler_fn(hello_world))
        .get("/users/:id", handler_fn(user))
        .post("/echo", handler_fn(echo))
        .default_handler(handler_fn(default_handler))
        .log_level(Level::INFO)
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server configuration");
            return;
        }
    };

    match server.listen(3000).await {
        Ok(listener) => listener.run().await,
        Err(e) => error!(cause = %e, "can't start server"),
    }
}
