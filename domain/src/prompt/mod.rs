//! Prompt templates for the research nodes.

pub mod template;

pub use template::PromptTemplate;
