//! Codecs: how notifications are written to a channel and read back.
//!
//! Broadcasters publish bytes, not Rust values. A [`Codec`] decides the
//! byte format; [`JsonCodec`] is the only one shipped, which keeps every
//! published message readable with `redis-cli`-style tooling or a browser.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// The methods are generic so one codec instance serves every payload
/// type. `DeserializeOwned` means decoded values never borrow from the
/// input buffer, so subscribers can drop the raw message right away.
pub trait Codec: Send + Sync + 'static {
    /// Serializes `value`.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Parses `data` as a `T`.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] on malformed or mismatched input.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] producing UTF-8 JSON via `serde_json`.
///
/// ```rust
/// use boardgame_protocol::{Codec, Event, JsonCodec, Notification};
///
/// let codec = JsonCodec;
/// let sent = Notification::new(Event::GameStarted, serde_json::json!({"id": "g1"}));
///
/// let bytes = codec.encode(&sent).unwrap();
/// let received: Notification = codec.decode(&bytes).unwrap();
/// assert_eq!(sent, received);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
