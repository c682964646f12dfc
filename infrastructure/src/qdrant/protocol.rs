//! Qdrant query API wire types

use scholia_application::{IndexPoint, VectorQuery};
use scholia_domain::{ResolvedFilter, ResourceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a [f32],
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    pub with_payload: bool,
}

impl<'a> From<&'a VectorQuery> for QueryRequest<'a> {
    fn from(query: &'a VectorQuery) -> Self {
        Self {
            query: &query.vector,
            limit: query.limit,
            filter: query.filter.as_ref().and_then(Filter::from_resolved),
            with_payload: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest<'a> {
    pub searches: Vec<QueryRequest<'a>>,
}

/// `must` conjunction of exact keyword matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub must: Vec<FieldCondition>,
}

impl Filter {
    /// `None` when the resolved filter has no terms.
    pub fn from_resolved(resolved: &ResolvedFilter) -> Option<Self> {
        if resolved.must.is_empty() {
            return None;
        }
        let must = resolved
            .must
            .iter()
            .map(|term| FieldCondition {
                key: term.field.index_key(),
                r#match: MatchValue {
                    value: term.value.clone(),
                },
            })
            .collect();
        Some(Self { must })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCondition {
    pub key: &'static str,
    pub r#match: MatchValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchValue {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub points: Vec<ScoredPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: PointId,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<ScoredPoint> for IndexPoint {
    fn from(point: ScoredPoint) -> Self {
        let id = match point.id {
            PointId::Num(n) => ResourceId::from(n),
            PointId::Uuid(s) => ResourceId::from(s.as_str()),
        };
        IndexPoint {
            id,
            score: point.score,
            payload: point.payload.unwrap_or_default(),
        }
    }
}
