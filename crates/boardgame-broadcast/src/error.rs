use boardgame_protocol::ProtocolError;

/// Errors that can occur while publishing or subscribing.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    /// The configured adapter name is not one this crate ships.
    #[error("Unknown broadcaster adapter: {0}")]
    UnknownAdapter(String),

    /// The adapter can publish but cannot deliver messages back in-process.
    #[error("the {adapter} adapter does not support subscriptions")]
    SubscribeUnsupported { adapter: &'static str },

    /// A notification could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The subscriber fell behind and missed messages.
    #[error("subscriber lagged, {0} messages skipped")]
    Lagged(u64),

    /// Every publisher for the channel is gone.
    #[error("channel closed")]
    Closed,
}
