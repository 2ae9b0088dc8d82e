//! Configuration for the chesspp client core.
//!
//! Provides TOML-based client settings with per-field defaults so partial
//! configs work out of the box, plus validation of the game-rules JSON
//! documents exchanged with the setup editor.

pub mod rules;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use rules::{validate_rules, RulesValidation};
pub use schema::{
    ChatConfig, ClientConfig, InviteConfig, RoomConfig, ServerConfig, TransportConfig,
};
pub use toml_loader::{load_from_path, save_to_path};

use chesspp_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creating a default
/// file if none exists. Out-of-range values are logged as warnings and the
/// parsed config is returned as-is.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    toml_loader::load_default()
}
