//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// Each research node is configured with one of these. Unknown names are
/// carried through as [`Model::Custom`] so any OpenAI-compatible endpoint
/// can be targeted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt5,
    Gpt5Mini,
    Gpt5Nano,
    Gpt41,
    Gpt41Mini,
    Gpt4o,
    Gpt4oMini,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt5 => "gpt-5",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Gpt5Nano => "gpt-5-nano",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Custom(s) => s,
        }
    }

    /// Whether the model accepts a `reasoning_effort` parameter
    pub fn supports_reasoning_effort(&self) -> bool {
        matches!(self, Model::Gpt5 | Model::Gpt5Mini | Model::Gpt5Nano)
    }
}

impl Default for Model {
    /// Returns the default model (GPT-5 nano)
    fn default() -> Self {
        Model::Gpt5Nano
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-5" => Model::Gpt5,
            "gpt-5-mini" => Model::Gpt5Mini,
            "gpt-5-nano" => Model::Gpt5Nano,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [Model::Gpt5, Model::Gpt5Mini, Model::Gpt5Nano, Model::Gpt41] {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "bge-chat-local".parse().unwrap();
        assert_eq!(model, Model::Custom("bge-chat-local".to_string()));
        assert_eq!(model.to_string(), "bge-chat-local");
        assert!(!model.supports_reasoning_effort());
    }

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default(), Model::Gpt5Nano);
        assert!(Model::default().supports_reasoning_effort());
    }

    #[test]
    fn test_model_serde_as_string() {
        let json = serde_json::to_string(&Model::Gpt5Mini).unwrap();
        assert_eq!(json, "\"gpt-5-mini\"");
        let parsed: Model = serde_json::from_str("\"gpt-4.1\"").unwrap();
        assert_eq!(parsed, Model::Gpt41);
    }
}
