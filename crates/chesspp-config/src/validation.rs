//! Configuration validation.
//!
//! Validates numeric ranges across all sections, collecting every problem
//! into a single `ConfigError` so the user sees the full list at once.

use crate::schema::ClientConfig;
use chesspp_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.base_url.is_empty() {
        errors.push("server.base_url must not be empty".into());
    } else if !config.server.base_url.starts_with("ws://")
        && !config.server.base_url.starts_with("wss://")
    {
        errors.push(format!(
            "server.base_url = {:?} must start with ws:// or wss://",
            config.server.base_url
        ));
    }

    validate_range(
        &mut errors,
        "transport.connect_timeout_secs",
        config.transport.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        &mut errors,
        "transport.reconnect_delay_secs",
        config.transport.reconnect_delay_secs,
        1,
        60,
    );
    validate_range(
        &mut errors,
        "transport.max_reconnect_attempts",
        u64::from(config.transport.max_reconnect_attempts),
        1,
        20,
    );
    validate_range(
        &mut errors,
        "invite.countdown_secs",
        config.invite.countdown_secs,
        1,
        60,
    );
    validate_range(
        &mut errors,
        "room.countdown_secs",
        config.room.countdown_secs,
        1,
        30,
    );
    validate_range(
        &mut errors,
        "room.host_grace_secs",
        config.room.host_grace_secs,
        0,
        30,
    );
    validate_range(
        &mut errors,
        "room.error_return_secs",
        config.room.error_return_secs,
        0,
        30,
    );
    validate_range(
        &mut errors,
        "chat.max_messages_per_scope",
        config.chat.max_messages_per_scope as u64,
        1,
        100_000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
