use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{Request, Response, MAX_MESSAGE_SIZE};

/// A message that can travel through [`RpcCodec`].
pub trait RpcMessage: Serialize + DeserializeOwned {
    fn type_tag(&self) -> u8;
}

impl RpcMessage for Request {
    fn type_tag(&self) -> u8 {
        Request::type_tag(self)
    }
}

impl RpcMessage for Response {
    fn type_tag(&self) -> u8 {
        Response::type_tag(self)
    }
}

/// Codec for encoding/decoding RPC messages.
pub struct RpcCodec;

impl RpcCodec {
    /// Encode a message with framing: [4 bytes len][1 byte tag][payload]
    pub fn encode<M: RpcMessage>(msg: &M) -> ProtocolResult<Vec<u8>> {
        let payload = bincode::serialize(msg)
            .map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let len = (payload.len() + 1) as u32;
        let mut buf = Vec::with_capacity(4 + 1 + payload.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.push(msg.type_tag());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode a framed message. Returns (message, bytes_consumed).
    ///
    /// The tag byte must agree with the decoded message.
    pub fn decode<M: RpcMessage>(data: &[u8]) -> ProtocolResult<(M, usize)> {
        if data.len() < 5 {
            return Err(ProtocolError::FramingError("too short".into()));
        }
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if len < 1 {
            return Err(ProtocolError::FramingError("zero-length frame".into()));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge { size: len - 1, max: MAX_MESSAGE_SIZE });
        }
        let total = 4 + len;
        if data.len() < total {
            return Err(ProtocolError::FramingError(format!(
                "incomplete: have {}, need {}", data.len(), total
            )));
        }
        let tag = data[4];
        let msg: M = bincode::deserialize(&data[5..total])
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        if msg.type_tag() != tag {
            return Err(ProtocolError::UnexpectedTag { expected: msg.type_tag(), found: tag });
        }
        Ok((msg, total))
    }
}
