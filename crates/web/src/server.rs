use std::convert::Infallible;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http::Method;
use nano_http::connection::HttpConnection;
use nano_http::handler::Handler;
use nano_http::protocol::{Request, Response};
use thiserror::Error;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::handler::RequestHandler;
use crate::invoker;
use crate::router::{Router, RouterBuilder, RouterError};

/// Collects routes, the optional default handler and logging settings.
pub struct ServerBuilder {
    router: RouterBuilder,
    default_handler: Option<Box<dyn RequestHandler>>,
    log_level: Option<Level>,
}

macro_rules! method_route {
    ($name:ident) => {
        pub fn $name<H: RequestHandler + 'static>(mut self, template: impl Into<String>, handler: H) -> Self {
            self.router = self.router.$name(template, handler);
            self
        }
    };
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: Router::builder(), default_handler: None, log_level: None }
    }

    pub fn route<H: RequestHandler + 'static>(mut self, method: Method, template: impl Into<String>, handler: H) -> Self {
        self.router = self.router.route(method, template, handler);
        self
    }

    method_route!(get);
    method_route!(post);
    method_route!(put);
    method_route!(delete);

    /// Handler used when no route matches; without one such requests get a `404`.
    pub fn default_handler(mut self, request_handler: impl RequestHandler + 'static) -> Self {
        self.default_handler = Some(Box::new(request_handler));
        self
    }

    /// Installs a `tracing` fmt subscriber at `level` when the server is built.
    ///
    /// Nothing is installed if the process already has a global subscriber.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn build(self) -> Result<Server, ServerError> {
        if let Some(level) = self.log_level {
            let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
            if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                debug!(cause = %e, "keeping the existing tracing subscriber");
            }
        }

        let router = self.router.build().inspect_err(|e| error!(cause = %e, "invalid route table"))?;
        Ok(Server { router, default_handler: self.default_handler })
    }
}

impl fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("router", &self.router)
            .field("default_handler", &self.default_handler.is_some())
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// A configured server: the route table plus the optional default handler.
///
/// `Server` is itself a [`Handler`], so it can be driven by any transport from
/// `nano_http::connection`; [`Server::listen`] wires it to tokio TCP sockets.
pub struct Server {
    router: Router,
    default_handler: Option<Box<dyn RequestHandler>>,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't bind server: {source}")]
    Bind {
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Router(#[from] RouterError),
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Routes and handles one assembled request.
    pub fn handle(&self, request: Request) -> Response {
        invoker::invoke(&self.router, self.default_handler.as_deref(), request)
    }

    /// Binds `0.0.0.0:port`.
    pub async fn listen(self, port: u16) -> Result<Listener, ServerError> {
        self.bind(("0.0.0.0", port)).await
    }

    pub async fn bind<A: ToSocketAddrs>(self, address: A) -> Result<Listener, ServerError> {
        let tcp_listener = TcpListener::bind(address).await.map_err(|source| {
            error!(cause = %source, "bind server error");
            ServerError::Bind { source }
        })?;

        if let Ok(local_addr) = tcp_listener.local_addr() {
            info!(%local_addr, routes = self.router.len(), "start listening");
        }
        Ok(Listener { tcp_listener, server: Arc::new(self) })
    }
}

impl Handler for Server {
    type Error = Infallible;

    fn call(&self, request: Request) -> Result<Response, Self::Error> {
        Ok(self.handle(request))
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("router", &self.router)
            .field("default_handler", &self.default_handler.is_some())
            .finish_non_exhaustive()
    }
}

/// A bound server, ready to accept connections.
#[derive(Debug)]
pub struct Listener {
    tcp_listener: TcpListener,
    server: Arc<Server>,
}

impl Listener {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.tcp_listener.local_addr()
    }

    /// Accepts connections forever, serving each one on its own task.
    pub async fn run(self) {
        loop {
            let (tcp_stream, remote_addr) = match self.tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let server = Arc::clone(&self.server);

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(server).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                    }
                }
            });
        }
    }
}
