//! Hand-written mocks shared by the use-case tests.

use crate::ports::embedding::{EmbeddingError, EmbeddingModel};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::progress::ProgressNotifier;
use crate::ports::vector_index::{IndexPoint, VectorIndex, VectorIndexError, VectorQuery};
use async_trait::async_trait;
use scholia_domain::{ModelSpec, PromptTemplate, ResearchPhase, ResolvedFilter, ResourceId};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==================== Language model ====================

/// Which research node a session was opened for, recovered from its system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Node {
    Conversation,
    Summarize,
    PlanReasoning,
    PlanQueries,
    Classify,
    Feedback,
    Compose,
}

impl Node {
    fn of(system_prompt: &str) -> Self {
        if system_prompt == PromptTemplate::conversation_system() {
            Node::Conversation
        } else if system_prompt == PromptTemplate::summarize_system() {
            Node::Summarize
        } else if system_prompt == PromptTemplate::plan_reasoning_system() {
            Node::PlanReasoning
        } else if system_prompt.starts_with("You are a semantic search assistant") {
            Node::PlanQueries
        } else if system_prompt == PromptTemplate::classify_system() {
            Node::Classify
        } else if system_prompt == PromptTemplate::feedback_system() {
            Node::Feedback
        } else {
            Node::Compose
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub node: Node,
    pub spec: ModelSpec,
    pub system_prompt: String,
    pub prompt: String,
}

type Reply = Result<String, GatewayError>;

/// Gateway whose replies are scripted per node.
///
/// Each node has a queue of replies; when a queue runs dry the node's
/// fallback reply is used. Every call is recorded.
pub(crate) struct MockGateway {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    scripted: Mutex<HashMap<Node, VecDeque<Reply>>>,
    fallback: Mutex<HashMap<Node, String>>,
    calls: Mutex<Vec<Call>>,
    delay: Mutex<Option<Duration>>,
}

impl MockState {
    fn reply(&self, node: Node) -> Reply {
        if let Some(reply) = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&node)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        Ok(self
            .fallback
            .lock()
            .unwrap()
            .get(&node)
            .cloned()
            .unwrap_or_default())
    }
}

impl MockGateway {
    /// Gateway that plans one query per round, never feels satisfied, and
    /// answers with a fixed text.
    pub fn new() -> Self {
        let fallback = HashMap::from([
            (Node::Conversation, "Earlier the user asked about Plato.".to_string()),
            (Node::Summarize, "A summary.".to_string()),
            (Node::PlanReasoning, "Look for the core concept.".to_string()),
            (
                Node::PlanQueries,
                r#"{"queries": [{"query": "virtue ethics", "filters": null}]}"#.to_string(),
            ),
            (Node::Classify, "No".to_string()),
            (Node::Feedback, "More sources needed.".to_string()),
            (Node::Compose, "Virtue is a mean between extremes.".to_string()),
        ]);
        let state = MockState {
            fallback: Mutex::new(fallback),
            ..Default::default()
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// Reply used whenever `node` has no scripted reply left.
    pub fn always(self, node: Node, reply: &str) -> Self {
        self.state
            .fallback
            .lock()
            .unwrap()
            .insert(node, reply.to_string());
        self
    }

    /// Queue one reply for `node`.
    pub fn then(self, node: Node, reply: Reply) -> Self {
        self.state
            .scripted
            .lock()
            .unwrap()
            .entry(node)
            .or_default()
            .push_back(reply);
        self
    }

    /// Delay every reply.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, node: Node) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.node == node)
            .collect()
    }
}

struct MockSession {
    state: Arc<MockState>,
    spec: ModelSpec,
    system_prompt: String,
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn create_session(
        &self,
        spec: &ModelSpec,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
            spec: spec.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

#[async_trait]
impl LlmSession for MockSession {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let node = Node::of(&self.system_prompt);
        self.state.calls.lock().unwrap().push(Call {
            node,
            spec: self.spec.clone(),
            system_prompt: self.system_prompt.clone(),
            prompt: content.to_string(),
        });
        let delay = *self.state.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state.reply(node)
    }
}

// ==================== Retrieval ====================

/// How the mock corpus answers one query text.
#[derive(Clone)]
pub(crate) enum Scripted {
    Points(Vec<IndexPoint>),
    IndexFailure,
    EmbedFailure,
    Panic,
}

/// Query texts seen by the embedder, addressable by vector.
///
/// The embedder maps each text to `[position]`; the index maps the vector
/// back to the text and looks up its scripted answer. Unscripted texts get
/// `limit` fresh points with ids `"{text}#{n}"`.
#[derive(Default)]
pub(crate) struct MockCorpus {
    texts: Mutex<Vec<String>>,
    scripted: Mutex<HashMap<String, Scripted>>,
    searches: Mutex<Vec<(String, Option<ResolvedFilter>, usize)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    batch_embed_calls: AtomicUsize,
    single_embed_calls: AtomicUsize,
    batch_search_calls: AtomicUsize,
    batch_search: Mutex<bool>,
    search_delay: Mutex<Option<Duration>>,
    fail_batch_embed: Mutex<bool>,
}

impl MockCorpus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, text: &str, answer: Scripted) {
        self.scripted
            .lock()
            .unwrap()
            .insert(text.to_string(), answer);
    }

    pub fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.lock().unwrap() = Some(delay);
    }

    /// Serve `search_batch`; by default it fails and the engine searches
    /// query by query.
    pub fn enable_batch_search(&self) {
        *self.batch_search.lock().unwrap() = true;
    }

    pub fn fail_batch_embedding(&self) {
        *self.fail_batch_embed.lock().unwrap() = true;
    }

    /// `(query text, filter, limit)` for every search, in call order.
    pub fn searches(&self) -> Vec<(String, Option<ResolvedFilter>, usize)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn batch_embed_calls(&self) -> usize {
        self.batch_embed_calls.load(Ordering::SeqCst)
    }

    pub fn single_embed_calls(&self) -> usize {
        self.single_embed_calls.load(Ordering::SeqCst)
    }

    pub fn batch_search_calls(&self) -> usize {
        self.batch_search_calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if matches!(
            self.scripted.lock().unwrap().get(text),
            Some(Scripted::EmbedFailure)
        ) {
            return Err(EmbeddingError::RequestFailed(format!("cannot embed {text}")));
        }
        let mut texts = self.texts.lock().unwrap();
        let position = match texts.iter().position(|t| t == text) {
            Some(position) => position,
            None => {
                texts.push(text.to_string());
                texts.len() - 1
            }
        };
        Ok(vec![position as f32])
    }

    fn text_for(&self, vector: &[f32]) -> Option<String> {
        let position = *vector.first()? as usize;
        self.texts.lock().unwrap().get(position).cloned()
    }
}

pub(crate) fn point(id: &str, text: &str, author: &str, source: &str) -> IndexPoint {
    let payload = serde_json::json!({ "text": text, "author": author, "source": source });
    IndexPoint {
        id: ResourceId::from(id),
        score: 0.9,
        payload: payload.as_object().cloned().unwrap_or_default(),
    }
}

pub(crate) struct MockEmbedder(pub Arc<MockCorpus>);

#[async_trait]
impl EmbeddingModel for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.0.single_embed_calls.fetch_add(1, Ordering::SeqCst);
        self.0.vector_for(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.0.batch_embed_calls.fetch_add(1, Ordering::SeqCst);
        if *self.0.fail_batch_embed.lock().unwrap() {
            return Err(EmbeddingError::RequestFailed("batch endpoint down".to_string()));
        }
        texts.iter().map(|t| self.0.vector_for(t)).collect()
    }
}

pub(crate) struct MockIndex(pub Arc<MockCorpus>);

#[async_trait]
impl VectorIndex for MockIndex {
    async fn search(&self, query: &VectorQuery) -> Result<Vec<IndexPoint>, VectorIndexError> {
        let corpus = &self.0;
        let text = corpus
            .text_for(&query.vector)
            .ok_or_else(|| VectorIndexError::InvalidResponse("unknown vector".to_string()))?;
        corpus
            .searches
            .lock()
            .unwrap()
            .push((text.clone(), query.filter.clone(), query.limit));

        let now = corpus.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        corpus.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = *corpus.search_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        corpus.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = corpus.scripted.lock().unwrap().get(&text).cloned();
        match scripted {
            Some(Scripted::Points(points)) => Ok(points),
            Some(Scripted::IndexFailure) => {
                Err(VectorIndexError::Unavailable(format!("index down for {text}")))
            }
            Some(Scripted::Panic) => panic!("index crashed on {text}"),
            Some(Scripted::EmbedFailure) | None => Ok((0..query.limit)
                .map(|n| {
                    point(
                        &format!("{text}#{n}"),
                        &format!("passage {n} about {text}"),
                        "Aristotle",
                        "Nicomachean Ethics",
                    )
                })
                .collect()),
        }
    }

    async fn search_batch(
        &self,
        queries: &[VectorQuery],
    ) -> Result<Vec<Vec<IndexPoint>>, VectorIndexError> {
        self.0.batch_search_calls.fetch_add(1, Ordering::SeqCst);
        if !*self.0.batch_search.lock().unwrap() {
            return Err(VectorIndexError::Unavailable(
                "batch search disabled".to_string(),
            ));
        }
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.search(query).await?);
        }
        Ok(results)
    }
}

// ==================== Progress ====================

/// Records `(phase, iteration)` for every phase start, and counts completed
/// tasks against the announced total the way a progress bar would.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub starts: Mutex<Vec<(ResearchPhase, usize)>>,
    pub tasks: Mutex<Vec<(ResearchPhase, String, bool)>>,
    /// `(position, length)` of the running phase.
    bar: Mutex<(usize, usize)>,
    overruns: Mutex<Vec<(ResearchPhase, usize, usize)>>,
}

impl RecordingProgress {
    /// `(phase, position, length)` for every completion past the total.
    pub fn overruns(&self) -> Vec<(ResearchPhase, usize, usize)> {
        self.overruns.lock().unwrap().clone()
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_phase_start(&self, phase: &ResearchPhase, iteration: usize, total_tasks: usize) {
        self.starts.lock().unwrap().push((*phase, iteration));
        *self.bar.lock().unwrap() = (0, total_tasks);
    }

    fn on_tasks_added(&self, _phase: &ResearchPhase, count: usize) {
        self.bar.lock().unwrap().1 += count;
    }

    fn on_task_complete(&self, phase: &ResearchPhase, label: &str, success: bool) {
        self.tasks
            .lock()
            .unwrap()
            .push((*phase, label.to_string(), success));
        let mut bar = self.bar.lock().unwrap();
        bar.0 += 1;
        if bar.0 > bar.1 {
            self.overruns.lock().unwrap().push((*phase, bar.0, bar.1));
        }
    }

    fn on_phase_complete(&self, _phase: &ResearchPhase, _elapsed: Duration) {}
}
