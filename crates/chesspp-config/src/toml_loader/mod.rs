//! TOML config loading: read from path or platform default.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path, save_to_path};
pub use paths::default_config_path;
pub use template::default_config_toml;
