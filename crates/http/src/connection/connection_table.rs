use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::codec::RequestDecoder;
use crate::connection::{respond, serialize};
use crate::handler::Handler;
use crate::protocol::Response;

/// Identifies one connection of the owning transport.
pub type ConnectionId = u64;

/// The outbound half of a transport.
pub trait Transport {
    /// Sends `bytes` on the connection and closes it afterwards.
    fn write_and_close(&mut self, connection_id: ConnectionId, bytes: Bytes);
}

/// Per-connection request assembly for event-driven transports.
///
/// An entry is created when a connection delivers its first bytes and removed when its
/// request completes, turns out malformed, or the connection closes. Entries never
/// share state, so connections cannot observe each other's partial input.
#[derive(Debug)]
pub struct ConnectionTable<H, T> {
    handler: H,
    transport: T,
    connections: HashMap<ConnectionId, Assembly>,
}

#[derive(Debug, Default)]
struct Assembly {
    buffer: BytesMut,
    decoder: RequestDecoder,
}

impl<H, T> ConnectionTable<H, T>
where
    H: Handler,
    T: Transport,
{
    pub fn new(handler: H, transport: T) -> Self {
        Self { handler, transport, connections: HashMap::new() }
    }

    /// Feeds a chunk received on `connection_id`.
    ///
    /// Once the chunk completes a request, the handler runs and the serialized response
    /// goes to [`Transport::write_and_close`].
    pub fn on_bytes_received(&mut self, connection_id: ConnectionId, chunk: &[u8]) {
        let assembly = self.connections.entry(connection_id).or_default();
        assembly.buffer.extend_from_slice(chunk);

        let response = match assembly.decoder.decode(&mut assembly.buffer) {
            Ok(None) => {
                trace!(connection_id, buffered = assembly.buffer.len(), "request incomplete");
                return;
            }
            Ok(Some(request)) => {
                debug!(connection_id, method = %request.method(), uri = %request.uri(), "request assembled");
                respond(&self.handler, request)
            }
            Err(e) => {
                warn!(connection_id, cause = %e, "malformed request");
                Response::error(e.status_code())
            }
        };

        self.connections.remove(&connection_id);
        self.transport.write_and_close(connection_id, serialize(&response));
    }

    /// Forgets whatever `connection_id` had delivered. No response is produced.
    pub fn on_connection_closed(&mut self, connection_id: ConnectionId) {
        if let Some(assembly) = self.connections.remove(&connection_id) {
            debug!(connection_id, buffered = assembly.buffer.len(), "connection closed before request completed");
        }
    }

    /// Number of connections with a partially received request.
    pub fn pending(&self) -> usize {
        self.connections.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
