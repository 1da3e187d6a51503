use std::sync::Arc;

use futures::StreamExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};

use crate::codec::RequestDecoder;
use crate::connection::{respond, serialize};
use crate::handler::Handler;
use crate::protocol::{HttpError, Response, SendError};

/// Initial capacity of the read buffer
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// An HTTP connection served by a tokio task
///
/// `HttpConnection` reads until one request is assembled, runs the handler on the
/// blocking thread pool so a slow handler only stalls its own connection, writes the
/// response and shuts the write half down.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE), writer }
    }

    /// Serves the single request of this connection.
    ///
    /// Returns `Ok(())` after a response was written, or when the peer went away before
    /// sending a complete request. A malformed request is answered with a 400-class
    /// response and then reported as an error.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + 'static,
    {
        let response = match self.framed_read.next().await {
            Some(Ok(request)) => {
                info!(method = %request.method(), uri = %request.uri(), "received request");
                match tokio::task::spawn_blocking(move || respond(handler.as_ref(), request)).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!(cause = %e, "request handler task failed");
                        Response::error(StatusCode::INTERNAL_SERVER_ERROR)
                    }
                }
            }

            Some(Err(e)) if e.is_io() => return Err(e.into()),

            Some(Err(e)) => {
                warn!(cause = %e, "can't parse request");
                self.write_and_close(&Response::error(e.status_code())).await?;
                return Err(e.into());
            }

            None => {
                info!("connection closed before a complete request arrived");
                return Ok(());
            }
        };

        self.write_and_close(&response).await
    }

    async fn write_and_close(&mut self, response: &Response) -> Result<(), HttpError> {
        let bytes = serialize(response);
        self.writer.write_all(&bytes).await.map_err(SendError::io)?;
        self.writer.flush().await.map_err(SendError::io)?;
        self.writer.shutdown().await.map_err(SendError::io)?;
        Ok(())
    }
}
