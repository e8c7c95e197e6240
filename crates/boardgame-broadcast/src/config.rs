//! Broadcaster configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BroadcastError;

/// Environment variable naming the adapter (`memory` or `log`).
pub const ADAPTER_ENV: &str = "BOARDGAME_ADAPTER";

/// Environment variable overriding the channel prefix.
pub const CHANNEL_PREFIX_ENV: &str = "BOARDGAME_CHANNEL_PREFIX";

/// Which [`BroadcastAdapter`](crate::BroadcastAdapter) a broadcaster
/// publishes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// In-process pub/sub; subscribers in the same process receive messages.
    #[default]
    Memory,
    /// Writes each message to the log; nobody can subscribe.
    Log,
}

impl AdapterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = BroadcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "log" => Ok(Self::Log),
            _ => Err(BroadcastError::UnknownAdapter(s.to_owned())),
        }
    }
}

/// Settings for a [`Broadcaster`](crate::Broadcaster).
///
/// ```rust
/// use boardgame_broadcast::{AdapterKind, BroadcastConfig};
///
/// let config = BroadcastConfig::default();
/// assert_eq!(config.adapter, AdapterKind::Memory);
/// assert_eq!(config.channel_prefix, "board_game_core");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub adapter: AdapterKind,

    /// Prepended to every channel name: `<prefix>:room:<id>`.
    pub channel_prefix: String,

    /// Messages buffered per in-memory channel before slow subscribers
    /// start to lag.
    pub capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            channel_prefix: "board_game_core".to_owned(),
            capacity: 256,
        }
    }
}

impl BroadcastConfig {
    /// Reads [`ADAPTER_ENV`] and [`CHANNEL_PREFIX_ENV`] from the process
    /// environment. Unset variables keep their defaults.
    ///
    /// # Errors
    /// [`BroadcastError::UnknownAdapter`] if the adapter name is not
    /// recognized.
    pub fn from_env() -> Result<Self, BroadcastError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), with variables resolved by
    /// `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BroadcastError> {
        let mut config = Self::default();
        if let Some(adapter) = lookup(ADAPTER_ENV) {
            config.adapter = adapter.parse()?;
        }
        if let Some(prefix) = lookup(CHANNEL_PREFIX_ENV) {
            config.channel_prefix = prefix;
        }
        Ok(config)
    }
}
