//! Configuration file loading for scholia
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCHOLIA_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./scholia.toml` or `./.scholia.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/scholia/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEmbeddingConfig, FileLlmConfig, FileLoggingConfig,
    FileMetadataConfig, FileModelEntry, FileModelsConfig, FileReplConfig, FileResearchConfig,
    FileVectorIndexConfig,
};
pub use loader::ConfigLoader;
