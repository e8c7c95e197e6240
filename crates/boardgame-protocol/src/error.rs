//! Error types for the protocol layer.

/// Errors raised while turning notifications into bytes and back.
///
/// Each crate in the workspace has its own error enum, so a
/// `ProtocolError` always means a serialization problem, never a game or
/// room rule.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A value could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Bytes could not be parsed into the requested type: malformed JSON,
    /// a missing field, or an unknown event name.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
