//! The research loop's single mutable record.

use crate::conversation::Conversation;
use crate::research::query::Query;
use serde::{Deserialize, Serialize};

/// State threaded through every node of one research cycle.
///
/// Every field is set by [`ResearchState::new`]; nodes never read a field
/// that does not exist yet. Nodes change it only through [`StateUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    conversation: Conversation,
    /// Queries produced by the most recent planning round.
    queries: Vec<Query>,
    /// Every query issued so far in this cycle (append-only).
    queries_made: Vec<Query>,
    /// Summaries of every passage retrieved so far (append-only).
    resource_summaries: Vec<String>,
    query_satisfied: bool,
    /// Evidence-gap feedback from the last assessment; empty when satisfied.
    feedback: String,
    response: String,
    /// Number of planning rounds started.
    iterations: usize,
}

impl ResearchState {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            queries: Vec::new(),
            queries_made: Vec::new(),
            resource_summaries: Vec::new(),
            query_satisfied: false,
            feedback: String::new(),
            response: String::new(),
            iterations: 0,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn queries_made(&self) -> &[Query] {
        &self.queries_made
    }

    pub fn resource_summaries(&self) -> &[String] {
        &self.resource_summaries
    }

    pub fn query_satisfied(&self) -> bool {
        self.query_satisfied
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Merge a node's partial update. Fields the update leaves unset keep
    /// their current value; the two logs only ever grow.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(queries) = update.queries {
            self.queries = queries;
        }
        self.queries_made.extend(update.append_queries_made);
        self.resource_summaries.extend(update.append_summaries);
        if let Some(satisfied) = update.query_satisfied {
            self.query_satisfied = satisfied;
        }
        if let Some(feedback) = update.feedback {
            self.feedback = feedback;
        }
        if let Some(response) = update.response {
            self.response = response;
        }
        if update.start_iteration {
            self.iterations += 1;
        }
    }
}

/// Partial update returned by one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub queries: Option<Vec<Query>>,
    pub append_queries_made: Vec<Query>,
    pub append_summaries: Vec<String>,
    pub query_satisfied: Option<bool>,
    pub feedback: Option<String>,
    pub response: Option<String>,
    pub start_iteration: bool,
}

impl StateUpdate {
    /// Update from a planning round: new current batch, logged as made.
    pub fn planned(queries: Vec<Query>) -> Self {
        Self {
            append_queries_made: queries.clone(),
            queries: Some(queries),
            start_iteration: true,
            ..Default::default()
        }
    }

    pub fn summarized(summaries: Vec<String>) -> Self {
        Self {
            append_summaries: summaries,
            ..Default::default()
        }
    }

    pub fn assessed(satisfied: bool, feedback: impl Into<String>) -> Self {
        Self {
            query_satisfied: Some(satisfied),
            feedback: Some(feedback.into()),
            ..Default::default()
        }
    }

    pub fn composed(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ResearchState {
        ResearchState::new(Conversation::new("What is justice?", Conversation::EMPTY_CONTEXT))
    }

    #[test]
    fn test_new_sets_documented_defaults() {
        let state = state();
        assert!(state.queries().is_empty());
        assert!(state.queries_made().is_empty());
        assert!(state.resource_summaries().is_empty());
        assert!(!state.query_satisfied());
        assert_eq!(state.feedback(), "");
        assert_eq!(state.response(), "");
        assert_eq!(state.iterations(), 0);
    }

    #[test]
    fn test_apply_preserves_unreturned_fields() {
        let mut state = state();
        state.apply(StateUpdate::assessed(false, "Need Plato's view"));
        state.apply(StateUpdate::summarized(vec!["summary".to_string()]));

        assert_eq!(state.feedback(), "Need Plato's view");
        assert!(!state.query_satisfied());
        assert_eq!(state.resource_summaries(), ["summary".to_string()]);
    }

    #[test]
    fn test_queries_made_is_append_only() {
        let mut state = state();
        state.apply(StateUpdate::planned(vec![Query::new("justice")]));
        state.apply(StateUpdate::planned(vec![
            Query::new("the republic"),
            Query::new("social contract"),
        ]));

        assert_eq!(state.queries().len(), 2);
        assert_eq!(state.queries_made().len(), 3);
        assert_eq!(state.queries_made()[0].text, "justice");
        assert_eq!(state.iterations(), 2);
    }

    #[test]
    fn test_empty_plan_still_counts_iteration() {
        let mut state = state();
        state.apply(StateUpdate::planned(vec![Query::new("a")]));
        state.apply(StateUpdate::planned(Vec::new()));

        assert!(state.queries().is_empty());
        assert_eq!(state.queries_made().len(), 1);
        assert_eq!(state.iterations(), 2);
    }

    #[test]
    fn test_composed_sets_response_only() {
        let mut state = state();
        state.apply(StateUpdate::assessed(true, ""));
        state.apply(StateUpdate::composed("Justice is..."));
        assert_eq!(state.response(), "Justice is...");
        assert!(state.query_satisfied());
    }
}
