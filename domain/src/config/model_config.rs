//! Role-based model configuration.
//!
//! [`ModelConfig`] groups the model selections for the research nodes.
//! This is a static value object: once created, models don't change at runtime.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// How much hidden reasoning a model should spend on a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    #[default]
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl std::fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            other => Err(format!("unknown reasoning effort: {}", other)),
        }
    }
}

/// A model plus the effort it should spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub model: Model,
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
}

impl ModelSpec {
    pub fn new(model: Model, reasoning_effort: ReasoningEffort) -> Self {
        Self {
            model,
            reasoning_effort,
        }
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.model, self.reasoning_effort)
    }
}

/// Role-based model configuration.
///
/// - **conversation**: summarizes prior turns into a context paragraph
/// - **summarize**: condenses each retrieved passage
/// - **plan**: reasons about and writes search queries
/// - **classify**: the yes/no sufficiency check
/// - **feedback**: explains evidence gaps for the next planning round
/// - **compose**: writes the final cited answer
///
/// # Example
///
/// ```
/// use scholia_domain::{Model, ModelConfig, ModelSpec, ReasoningEffort};
///
/// let config = ModelConfig::default()
///     .with_compose(ModelSpec::new(Model::Gpt5, ReasoningEffort::Medium));
///
/// assert_eq!(config.compose.model, Model::Gpt5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub conversation: ModelSpec,
    pub summarize: ModelSpec,
    pub plan: ModelSpec,
    pub classify: ModelSpec,
    pub feedback: ModelSpec,
    pub compose: ModelSpec,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let nano_minimal = ModelSpec::new(Model::Gpt5Nano, ReasoningEffort::Minimal);
        Self {
            conversation: nano_minimal.clone(),
            summarize: nano_minimal.clone(),
            plan: ModelSpec::new(Model::Gpt5Nano, ReasoningEffort::Low),
            classify: nano_minimal.clone(),
            feedback: nano_minimal,
            compose: ModelSpec::new(Model::Gpt5Mini, ReasoningEffort::Low),
        }
    }
}

impl ModelConfig {
    // ==================== Builder Methods ====================

    pub fn with_conversation(mut self, spec: ModelSpec) -> Self {
        self.conversation = spec;
        self
    }

    pub fn with_summarize(mut self, spec: ModelSpec) -> Self {
        self.summarize = spec;
        self
    }

    pub fn with_plan(mut self, spec: ModelSpec) -> Self {
        self.plan = spec;
        self
    }

    pub fn with_classify(mut self, spec: ModelSpec) -> Self {
        self.classify = spec;
        self
    }

    pub fn with_feedback(mut self, spec: ModelSpec) -> Self {
        self.feedback = spec;
        self
    }

    pub fn with_compose(mut self, spec: ModelSpec) -> Self {
        self.compose = spec;
        self
    }
}
