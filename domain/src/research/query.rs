//! Search queries and their metadata filters.

use serde::{Deserialize, Serialize};

/// Loose author / work constraint attached to a query.
///
/// Values are whatever the planner wrote ("Aristotel", "Nicomachean");
/// they are resolved against the metadata catalog before retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl Filter {
    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            source_title: None,
        }
    }

    pub fn source_title(source_title: impl Into<String>) -> Self {
        Self {
            author: None,
            source_title: Some(source_title.into()),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_source_title(mut self, source_title: impl Into<String>) -> Self {
        self.source_title = Some(source_title.into());
        self
    }

    /// True when neither field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.author) && blank(&self.source_title)
    }
}

/// One semantic search request (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Conceptual search text; author and work names belong in `filters`.
    #[serde(rename = "query", default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filter>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: None,
        }
    }

    pub fn with_filters(mut self, filters: Filter) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Filters with blank fields collapsed away.
    pub fn effective_filters(&self) -> Option<&Filter> {
        self.filters.as_ref().filter(|f| !f.is_empty())
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.text)?;
        if let Some(filters) = self.effective_filters() {
            if let Some(author) = &filters.author {
                write!(f, " author~{}", author)?;
            }
            if let Some(source) = &filters.source_title {
                write!(f, " source~{}", source)?;
            }
        }
        Ok(())
    }
}

/// Wrapper matching the structured-output schema `{ "queries": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBatch {
    #[serde(default)]
    pub queries: Vec<Query>,
}

impl QueryBatch {
    /// JSON schema handed to the model for schema-constrained output.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "queries": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "query": {
                                "type": "string",
                                "description": "Conceptual search string for semantic search"
                            },
                            "filters": {
                                "type": ["object", "null"],
                                "properties": {
                                    "author": {
                                        "type": ["string", "null"],
                                        "description": "Author name to filter by"
                                    },
                                    "source_title": {
                                        "type": ["string", "null"],
                                        "description": "Source title to filter by"
                                    }
                                },
                                "required": ["author", "source_title"],
                                "additionalProperties": false
                            }
                        },
                        "required": ["query", "filters"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["queries"],
            "additionalProperties": false
        })
    }

    /// Accepts either `{ "queries": [...] }` or a bare array of queries.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_array() {
            let queries = serde_json::from_value(value.clone())?;
            return Ok(Self { queries });
        }
        serde_json::from_value(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_json_shape() {
        let query = Query::new("virtue ethics").with_filters(Filter::author("Aristotle"));
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"query": "virtue ethics", "filters": {"author": "Aristotle"}})
        );
    }

    #[test]
    fn test_batch_from_object() {
        let value = serde_json::json!({
            "queries": [
                {"query": "categorical imperative", "filters": {"author": "Kant", "source_title": null}},
                {"query": "the good life"}
            ]
        });
        let batch = QueryBatch::from_json(&value).unwrap();
        assert_eq!(batch.queries.len(), 2);
        assert_eq!(
            batch.queries[0].filters.as_ref().unwrap().author.as_deref(),
            Some("Kant")
        );
        assert!(batch.queries[1].filters.is_none());
    }

    #[test]
    fn test_batch_from_bare_array() {
        let value = serde_json::json!([{"query": "free will"}]);
        let batch = QueryBatch::from_json(&value).unwrap();
        assert_eq!(batch.queries, vec![Query::new("free will")]);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = Query::new("justice").with_filters(Filter {
            author: Some("  ".to_string()),
            source_title: None,
        });
        assert!(query.effective_filters().is_none());
        assert_eq!(query.to_string(), "\"justice\"");
    }

    #[test]
    fn test_display_includes_filters() {
        let query = Query::new("the cave")
            .with_filters(Filter::author("Plato").with_source_title("Republic"));
        assert_eq!(query.to_string(), "\"the cave\" author~Plato source~Republic");
    }

    #[test]
    fn test_schema_requires_queries() {
        let schema = QueryBatch::json_schema();
        assert_eq!(schema["required"][0], "queries");
    }
}
