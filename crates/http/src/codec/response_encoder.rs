//! Response serializer: head through [`HeaderEncoder`], then the body bytes verbatim.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::header::HeaderEncoder;
use crate::protocol::{Response, SendError};

#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `response` into a fresh buffer.
    pub fn encode_to_bytes(&mut self, response: &Response) -> Result<Bytes, SendError> {
        let mut dst = BytesMut::with_capacity(response.body().len());
        Encoder::<&Response>::encode(self, response, &mut dst)?;
        Ok(dst.freeze())
    }
}

impl Encoder<&Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(response, dst)?;
        dst.extend_from_slice(response.body());
        Ok(())
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Encoder::<&Response>::encode(self, &response, dst)
    }
}
