//! Client configuration schema.
//!
//! Every section and field carries a serde default so a partial TOML file
//! (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub transport: TransportConfig,
    pub invite: InviteConfig,
    pub room: RoomConfig,
    pub chat: ChatConfig,
}

/// Where the game/lobby server lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base websocket URL; channel paths are appended as `/ws/game/{room}/`.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "ws://localhost:8000".to_string(),
        }
    }
}

/// Socket session tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// How long a single connect attempt may take before it counts as failed.
    pub connect_timeout_secs: u64,
    /// Fixed interval between reconnect attempts.
    pub reconnect_delay_secs: u64,
    /// Reconnect attempts before the session gives up and reports `Failed`.
    pub max_reconnect_attempts: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            reconnect_delay_secs: 2,
            max_reconnect_attempts: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    /// Seconds an incoming challenge stays open before it auto-declines.
    pub countdown_secs: u64,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self { countdown_secs: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Length of the pre-game countdown display.
    pub countdown_secs: u64,
    /// Grace period between a host-left notice and forced room teardown.
    pub host_grace_secs: u64,
    /// Delay before returning to the lobby after a room-not-found error.
    pub error_return_secs: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            host_grace_secs: 2,
            error_return_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum messages retained per chat scope.
    pub max_messages_per_scope: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_messages_per_scope: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = ClientConfig::default();
        assert_eq!(config.transport.max_reconnect_attempts, 5);
        assert_eq!(config.invite.countdown_secs, 5);
        assert_eq!(config.room.countdown_secs, 3);
        assert_eq!(config.room.host_grace_secs, 2);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
[transport]
reconnect_delay_secs = 7
"#,
        )
        .unwrap();
        assert_eq!(config.transport.reconnect_delay_secs, 7);
        assert_eq!(config.transport.max_reconnect_attempts, 5);
        assert_eq!(config.server.base_url, "ws://localhost:8000");
    }
}
