//! Retrieved passages and their identity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque identity of an indexed passage.
///
/// Vector indexes hand out either integer or UUID ids; both are kept as
/// their canonical string form so equality is all that matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A passage returned by the vector index plus its metadata (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedResource {
    pub id: ResourceId,
    pub text: String,
    pub author: String,
    pub source_title: String,
}

impl RetrievedResource {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown Author";
    pub const UNKNOWN_SOURCE: &'static str = "Unknown Source";

    pub fn new(
        id: impl Into<ResourceId>,
        text: impl Into<String>,
        author: impl Into<String>,
        source_title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: author.into(),
            source_title: source_title.into(),
        }
    }

    /// Build from an index payload with `text`, `author` and `source` keys.
    pub fn from_payload(id: ResourceId, payload: &serde_json::Map<String, serde_json::Value>) -> Self {
        let field = |key: &str| payload.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            id,
            text: field("text").unwrap_or_default(),
            author: field("author").unwrap_or_else(|| Self::UNKNOWN_AUTHOR.to_string()),
            source_title: field("source").unwrap_or_else(|| Self::UNKNOWN_SOURCE.to_string()),
        }
    }

    /// Quoted passage followed by its attribution line.
    pub fn render(&self) -> String {
        format!(
            "\"\"\"\n{}\n\"\"\"\n- {}, {}\n",
            self.text, self.author, self.source_title
        )
    }
}

/// Drop later occurrences of an id, keeping the first one and the
/// original order.
pub fn dedup_by_id(resources: Vec<RetrievedResource>) -> Vec<RetrievedResource> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format() {
        let resource = RetrievedResource::new(7u64, "Virtue is a mean.", "Aristotle", "Nicomachean Ethics");
        assert_eq!(
            resource.render(),
            "\"\"\"\nVirtue is a mean.\n\"\"\"\n- Aristotle, Nicomachean Ethics\n"
        );
    }

    #[test]
    fn test_from_payload_defaults() {
        let payload = serde_json::json!({"text": "Know thyself."});
        let resource = RetrievedResource::from_payload(
            ResourceId::new("a1"),
            payload.as_object().unwrap(),
        );
        assert_eq!(resource.author, RetrievedResource::UNKNOWN_AUTHOR);
        assert_eq!(resource.source_title, RetrievedResource::UNKNOWN_SOURCE);
        assert_eq!(resource.text, "Know thyself.");
    }

    #[test]
    fn test_dedup_keeps_first_and_order() {
        let resources = vec![
            RetrievedResource::new(1u64, "a", "A", "S"),
            RetrievedResource::new(2u64, "b", "B", "S"),
            RetrievedResource::new(1u64, "a again", "A", "S"),
            RetrievedResource::new(3u64, "c", "C", "S"),
        ];
        let deduped = dedup_by_id(resources);
        let ids: Vec<_> = deduped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(deduped[0].text, "a");
    }

    #[test]
    fn test_integer_and_string_ids_compare_by_text() {
        assert_eq!(ResourceId::from(42u64), ResourceId::from("42"));
    }
}
