//! Configuration value objects owned by the domain.

pub mod model_config;

pub use model_config::{ModelConfig, ModelSpec, ReasoningEffort};
