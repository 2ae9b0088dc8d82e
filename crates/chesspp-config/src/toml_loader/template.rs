//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> String {
    r##"# chesspp client configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# base_url = "ws://localhost:8000"

[transport]
# connect_timeout_secs = 15
# reconnect_delay_secs = 2      # fixed interval between attempts
# max_reconnect_attempts = 5    # then the session reports "failed"

[invite]
# countdown_secs = 5            # incoming challenges auto-decline after this

[room]
# countdown_secs = 3            # pre-game countdown display
# host_grace_secs = 2           # delay before teardown after the host leaves
# error_return_secs = 2         # delay before returning to the lobby on error

[chat]
# max_messages_per_scope = 500
"##
    .to_string()
}
