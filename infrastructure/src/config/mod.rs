//! Configuration file loading for gradewise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `GRADEWISE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./gradewise.toml` or `./.gradewise.toml`
//! 4. Global: `$XDG_CONFIG_HOME/gradewise/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileConfig, FileGradingConfig,
    FileOutputConfig, FileProviderConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
