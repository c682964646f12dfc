//! Per-node model configuration from TOML (`[models]` section)

use scholia_domain::{Model, ModelConfig, ModelSpec, ReasoningEffort};
use serde::{Deserialize, Serialize};

/// One node's model override; unset fields keep the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelEntry {
    pub model: Option<String>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl FileModelEntry {
    fn apply(&self, base: ModelSpec) -> ModelSpec {
        ModelSpec {
            model: match &self.model {
                // Model::from_str is infallible; unknown names become Custom(...)
                Some(name) => name.trim().parse::<Model>().unwrap_or(base.model),
                None => base.model,
            },
            reasoning_effort: self.reasoning_effort.unwrap_or(base.reasoning_effort),
        }
    }

    fn has_empty_name(&self) -> bool {
        self.model.as_deref().is_some_and(|m| m.trim().is_empty())
    }
}

/// Model used by each research node
///
/// # Example
///
/// ```toml
/// [models.plan]
/// model = "gpt-5-nano"
/// reasoning_effort = "low"
///
/// [models.compose]
/// model = "gpt-5"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Summarizes prior chat turns
    pub conversation: FileModelEntry,
    /// Summarizes each retrieved passage
    pub summarize: FileModelEntry,
    /// Reasons about and writes search queries
    pub plan: FileModelEntry,
    /// Yes/no sufficiency classifier
    pub classify: FileModelEntry,
    /// Explains evidence gaps
    pub feedback: FileModelEntry,
    /// Writes the final answer
    pub compose: FileModelEntry,
}

impl FileModelsConfig {
    /// Overlay the configured entries on the built-in defaults.
    pub fn to_model_config(&self) -> ModelConfig {
        let defaults = ModelConfig::default();
        ModelConfig {
            conversation: self.conversation.apply(defaults.conversation),
            summarize: self.summarize.apply(defaults.summarize),
            plan: self.plan.apply(defaults.plan),
            classify: self.classify.apply(defaults.classify),
            feedback: self.feedback.apply(defaults.feedback),
            compose: self.compose.apply(defaults.compose),
        }
    }

    /// Names of nodes whose model name is set but blank.
    pub fn empty_model_names(&self) -> Vec<&'static str> {
        [
            ("conversation", &self.conversation),
            ("summarize", &self.summarize),
            ("plan", &self.plan),
            ("classify", &self.classify),
            ("feedback", &self.feedback),
            ("compose", &self.compose),
        ]
        .into_iter()
        .filter(|(_, entry)| entry.has_empty_name())
        .map(|(name, _)| name)
        .collect()
    }
}
