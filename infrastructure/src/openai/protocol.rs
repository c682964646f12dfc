//! Wire types for the OpenAI chat-completions and embeddings APIs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat<'a>>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, system_prompt: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            reasoning_effort: None,
            response_format: None,
        }
    }

    pub fn with_reasoning_effort(mut self, effort: &'static str) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    pub fn with_json_schema(mut self, schema: &'a serde_json::Value) -> Self {
        self.response_format = Some(ResponseFormat::json_schema(schema));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaFormat<'a>,
}

impl<'a> ResponseFormat<'a> {
    pub fn json_schema(schema: &'a serde_json::Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: "response",
                schema,
                strict: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat<'a> {
    pub name: &'static str,
    pub schema: &'a serde_json::Value,
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Vectors in input order.
    pub fn into_vectors(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().map(|d| d.embedding).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_shape() {
        let schema = json!({"type": "object"});
        let request = ChatRequest::new("gpt-5-nano", "Be brief.", "Hello")
            .with_reasoning_effort("minimal")
            .with_json_schema(&schema);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-5-nano");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hello");
        assert_eq!(value["reasoning_effort"], "minimal");
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["schema"], schema);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let request = ChatRequest::new("gpt-4o", "s", "u");
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("reasoning_effort").is_none());
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_chat_response_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "Yes"}}]
        }))
        .unwrap();
        assert_eq!(response.into_content().as_deref(), Some("Yes"));

        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(empty.into_content().is_none());
    }

    #[test]
    fn test_embedding_response_restores_input_order() {
        let response: EmbeddingResponse = serde_json::from_value(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        }))
        .unwrap();
        assert_eq!(
            response.into_vectors(),
            vec![vec![1.0, 0.0], vec![0.0, 1.0]]
        );
    }
}
